// Application state for HTTP handlers
use crate::application::machine_service::MachineService;
use crate::application::monitor_session::MonitorSession;
use crate::application::prediction_service::PredictionService;

#[derive(Clone)]
pub struct AppState {
    pub machine_service: MachineService,
    pub monitor_session: MonitorSession,
    pub prediction_service: PredictionService,
}
