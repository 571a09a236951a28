//! Global state of the reapy extension inside REAPER.
//!
//! REAPER calls the registered `timer` function on the main thread
//! about 30 times per second. Everything that needs the in-process host
//! from a background source (like the socket server) goes through a
//! [Timer].
use crate::{
    errors::{ReapyError, ReapyResult},
    server::Dispatcher,
    InProcessHost,
};
use c_str_macro::c_str;
use log::{debug, error};
use rea_rs_low::{register_plugin_destroy_hook, PluginContext};
use std::{
    collections::HashMap,
    ptr::{addr_of, addr_of_mut},
    time::{Duration, Instant},
};

static mut INSTANCE: Option<Extension> = None;

/// Job, repeated on the main thread.
pub trait Timer {
    fn run(&mut self, host: &InProcessHost) -> anyhow::Result<()>;
    fn id_string(&self) -> String;
    /// Minimal pause between two runs.
    fn interval(&self) -> Duration {
        Duration::from_secs(0)
    }
}

impl Timer for Dispatcher {
    fn run(&mut self, host: &InProcessHost) -> anyhow::Result<()> {
        let answered = self.tick(host)?;
        if answered > 0 {
            debug!("answered {} requests", answered);
        }
        Ok(())
    }

    fn id_string(&self) -> String {
        "reapy dispatcher".to_string()
    }
}

extern "C" fn timer_f() {
    let Some(extension) = Extension::get_mut() else {
        return;
    };
    let host = &extension.host;
    for (id, (last_time, timer)) in extension.timers.iter_mut() {
        let now = Instant::now();
        if now.duration_since(*last_time) >= timer.interval() {
            if let Err(e) = timer.run(host) {
                error!("timer {} failed: {:#}", id, e);
            }
            *last_time = now;
        }
    }
}

pub struct Extension {
    host: InProcessHost,
    timers: HashMap<String, (Instant, Box<dyn Timer>)>,
}
impl Extension {
    pub fn load(context: PluginContext) -> Self {
        Self {
            host: InProcessHost::load(context),
            timers: HashMap::new(),
        }
    }

    fn make_available_globally(extension: Extension) {
        static INIT_INSTANCE: std::sync::Once = std::sync::Once::new();
        unsafe {
            INIT_INSTANCE.call_once(|| {
                INSTANCE = Some(extension);
                register_plugin_destroy_hook(|| INSTANCE = None);
            });
        }
    }

    /// Load the extension and keep it for the lifetime of the plugin.
    pub fn init_global(
        context: PluginContext,
    ) -> ReapyResult<&'static mut Self> {
        Self::make_available_globally(Self::load(context));
        Self::get_mut().ok_or(ReapyError::NullHandle("extension"))
    }

    /// Instance made available by [Extension::init_global].
    pub fn get() -> Option<&'static Self> {
        unsafe { (*addr_of!(INSTANCE)).as_ref() }
    }

    pub fn get_mut() -> Option<&'static mut Self> {
        unsafe { (*addr_of_mut!(INSTANCE)).as_mut() }
    }

    pub fn host(&self) -> &InProcessHost {
        &self.host
    }

    pub fn register_timer(&mut self, timer: Box<dyn Timer>) {
        debug!("register timer {}", timer.id_string());
        self.timers
            .insert(timer.id_string(), (Instant::now(), timer));
        if self.timers.len() == 1 {
            unsafe {
                self.host.low().plugin_register(
                    c_str!("timer").as_ptr(),
                    timer_f as *mut _,
                );
            }
        }
    }

    pub fn unregister_timer(&mut self, id_string: &str) -> ReapyResult<()> {
        match self.timers.remove(id_string) {
            Some(_) => {
                if self.timers.is_empty() {
                    unsafe {
                        self.host.low().plugin_register(
                            c_str!("-timer").as_ptr(),
                            timer_f as *mut _,
                        );
                    }
                }
                Ok(())
            }
            None => Err(ReapyError::NullHandle("timer")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_instance_before_init() {
        assert!(Extension::get().is_none());
        assert!(Extension::get_mut().is_none());
    }
}
