pub mod cors;
pub mod envelope;

pub use envelope::Envelope;
