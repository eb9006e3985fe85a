pub mod deploy;
pub mod doctor;
