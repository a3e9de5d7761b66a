pub mod appointment;
pub mod config;
pub mod department;
pub mod doctor;
pub mod notice;
pub mod service;

pub use appointment::{
    Appointment, AppointmentStatus, BookAppointmentRequest, UpdateAppointmentRequest,
};
pub use config::{HospitalConfig, UpdateConfigRequest};
pub use department::{Department, NewDepartmentRequest};
pub use doctor::{Doctor, NewDoctorRequest, UpdateDoctorRequest};
pub use notice::{NewNoticeRequest, Notice};
pub use service::{NewServiceRequest, Service};
