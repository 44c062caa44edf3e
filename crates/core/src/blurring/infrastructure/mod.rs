pub mod blurrer_factory;
pub mod cpu_gaussian_blurrer;
mod gaussian;
