pub mod pipeline;
pub mod statistics;
