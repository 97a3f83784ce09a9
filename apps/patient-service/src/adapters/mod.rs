pub mod patients_sea;
