pub mod record;
pub mod tolerance;

pub use record::{
    AnnotationRecord,
    IdentityKey,
    MLSSF_FRAGMENT_TYPE,
};
pub use tolerance::RtTolerance;
