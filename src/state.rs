use std::sync::Arc;

use crate::store::HospitalStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<HospitalStore>,
}
