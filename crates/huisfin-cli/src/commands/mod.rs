pub mod gifts;
pub mod mortgage;
