use crate::args::options::RunOptions;
use crate::error::LoadrError;
use crate::orchestrator::handle::WorkerHandle;
use crate::orchestrator::launcher::WorkerLauncher;
use std::sync::Arc;
use tracing::{error, info};

pub struct Dispatcher {
    launcher: Arc<dyn WorkerLauncher>,
}

impl Dispatcher {
    pub fn new(launcher: Arc<dyn WorkerLauncher>) -> Self {
        Self { launcher }
    }

    /// Starts `options.processes` workers with the same options.
    ///
    /// Handles are returned in submission order. A worker that cannot be
    /// started fails the whole run; the workers started before it are aborted.
    pub fn dispatch(&self, options: Arc<RunOptions>) -> Result<Vec<WorkerHandle>, LoadrError> {
        let processes = options.processes.get() as usize;
        info!(
            "Dispatching {} worker(s), {} messages each...",
            processes, options.msg_count
        );

        let mut handles = Vec::with_capacity(processes);
        for index in 0..processes {
            match self.launcher.launch(index, options.clone()) {
                Ok(handle) => handles.push(handle),
                Err(launch_error) => {
                    error!("Cannot start worker #{index}: {launch_error}");
                    handles.iter().for_each(WorkerHandle::abort);
                    return Err(launch_error);
                }
            }
        }

        Ok(handles)
    }
}
