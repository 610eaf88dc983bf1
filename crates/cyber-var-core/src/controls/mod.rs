pub mod posture;
