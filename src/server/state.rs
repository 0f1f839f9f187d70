use crate::optimizer::Optimizer;
use std::sync::Mutex;

pub struct AppState {
    pub optimizer: Mutex<Optimizer>,
}
