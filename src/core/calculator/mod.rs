pub mod accumulated;
pub mod norm;
