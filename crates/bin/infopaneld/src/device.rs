//! Host and runtime metrics for `/api/debug/device`.

use std::time::Instant;

use sysinfo::{Pid, System};
use tokio::runtime::Handle;

use infopanel_app::ports::DeviceProbe;
use infopanel_domain::diagnostics::{DeviceInfo, format_mib, format_uptime};

/// Samples memory through `sysinfo` and task counts from the tokio runtime.
pub struct SysinfoProbe {
    system: System,
    pid: Option<Pid>,
    runtime: Handle,
    started: Instant,
}

impl SysinfoProbe {
    /// Must be called from inside the runtime whose metrics are reported.
    pub fn new(runtime: Handle) -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(err) => {
                tracing::warn!(error = err, "process memory unavailable");
                None
            }
        };
        Self {
            system,
            pid,
            runtime,
            started: Instant::now(),
        }
    }
}

impl DeviceProbe for SysinfoProbe {
    fn sample(&mut self) -> DeviceInfo {
        self.system.refresh_memory();
        let process_memory = self
            .pid
            .filter(|pid| self.system.refresh_process(*pid))
            .and_then(|pid| self.system.process(pid))
            .map_or_else(|| "-".to_string(), |process| format_mib(process.memory()));
        let metrics = self.runtime.metrics();
        DeviceInfo {
            uptime: format_uptime(self.started.elapsed()),
            worker_threads: metrics.num_workers(),
            alive_tasks: metrics.num_alive_tasks(),
            process_memory,
            system_memory: format!(
                "{} / {}",
                format_mib(self.system.used_memory()),
                format_mib(self.system.total_memory())
            ),
            num_cpu: self.system.cpus().len(),
        }
    }
}
