use crate::{
    config::Config,
    errors::ReapyResult,
    project::collect,
    Call, DistantHost, Host, InProcessHost, Program, ProgramOutput, Project,
    Step,
};
use rea_rs_low::PluginContext;

/// Entry point of the object layer.
///
/// Owns the host; projects and everything below borrow it.
#[derive(Debug)]
pub struct Reapy {
    host: Box<dyn Host>,
}
impl Reapy {
    pub fn new(host: impl Host + 'static) -> Self {
        Self {
            host: Box::new(host),
        }
    }

    /// Inside REAPER, from the extension entry point.
    pub fn in_process(context: PluginContext) -> Self {
        Self::new(InProcessHost::load(context))
    }

    /// From another process, through the reapy server extension.
    pub fn connect(config: &Config) -> ReapyResult<Self> {
        Ok(Self::new(DistantHost::connect(config)?))
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    /// Execute a hand-made batch of calls.
    pub fn run(&self, program: &Program) -> ReapyResult<ProgramOutput> {
        self.host.run(program)
    }

    pub fn current_project(&self) -> ReapyResult<Project<'_>> {
        Project::current(self.host())
    }

    /// Project by its tab index.
    pub fn project(&self, index: usize) -> ReapyResult<Project<'_>> {
        Project::from_index(self.host(), index as i32)
    }

    /// Projects of all open tabs.
    pub fn projects(&self) -> ReapyResult<Vec<Project<'_>>> {
        let host = self.host();
        collect(
            host,
            Step::CollectUntilEnd {
                each: Call::EnumProjects { index: 0 },
                limit: None,
            },
        )?
        .into_iter()
        .filter_map(|value| value.into_project().transpose())
        .map(|id| id.map(|id| Project::from_id(host, id)))
        .collect()
    }

    pub fn show_console_msg(&self, msg: impl Into<String>) -> ReapyResult<()> {
        self.host
            .call(Call::ShowConsoleMsg {
                message: msg.into(),
            })?
            .into_unit()
    }

    pub fn clear_console(&self) -> ReapyResult<()> {
        self.host.call(Call::ClearConsole)?.into_unit()
    }

    /// Redraw the arrange view.
    pub fn update_arrange(&self) -> ReapyResult<()> {
        self.host.call(Call::UpdateArrange)?.into_unit()
    }
}
