mod temporal_error;

pub use temporal_error::{TemporalError, TemporalResult};
