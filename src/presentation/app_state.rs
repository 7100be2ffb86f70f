// Application state for HTTP handlers
use crate::application::acquisition_service::AcquisitionService;
use crate::application::history_service::HistoryService;

#[derive(Clone)]
pub struct AppState {
    pub acquisition_service: AcquisitionService,
    pub history_service: HistoryService,
}
