use crate::{errors::ReapyResult, Call, Project};

/// Time selection of a project.
///
/// Holds no state of its own: every getter queries the host, every setter
/// rewrites the whole range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSelection<'h> {
    project: Project<'h>,
}
impl<'h> TimeSelection<'h> {
    pub fn new(project: Project<'h>) -> Self {
        Self { project }
    }

    pub fn project(&self) -> Project<'h> {
        self.project
    }

    fn get_set(
        &self,
        is_set: bool,
        start: f64,
        end: f64,
    ) -> ReapyResult<(f64, f64)> {
        let value = self.project.host().call(Call::GetSetLoopTimeRange2 {
            project: self.project.id(),
            is_set,
            is_loop: false,
            start,
            end,
            allow_autoseek: false,
        })?;
        Ok((
            value.clone().nth(0)?.into_float()?,
            value.nth(1)?.into_float()?,
        ))
    }

    /// `(start, end)` in seconds.
    pub fn get(&self) -> ReapyResult<(f64, f64)> {
        self.get_set(false, 0.0, 0.0)
    }

    pub fn set(&self, start: f64, end: f64) -> ReapyResult<()> {
        self.get_set(true, start, end)?;
        Ok(())
    }

    pub fn start(&self) -> ReapyResult<f64> {
        Ok(self.get()?.0)
    }

    pub fn set_start(&self, start: f64) -> ReapyResult<()> {
        let (_, end) = self.get()?;
        self.set(start, end)
    }

    pub fn end(&self) -> ReapyResult<f64> {
        Ok(self.get()?.1)
    }

    pub fn set_end(&self, end: f64) -> ReapyResult<()> {
        let (start, _) = self.get()?;
        self.set(start, end)
    }

    pub fn length(&self) -> ReapyResult<f64> {
        let (start, end) = self.get()?;
        Ok(end - start)
    }

    /// Keep start and move end.
    pub fn set_length(&self, length: f64) -> ReapyResult<()> {
        let (start, _) = self.get()?;
        self.set(start, start + length)
    }

    /// Whether the loop (repeat) is on.
    pub fn is_looping(&self) -> ReapyResult<bool> {
        Ok(self.repeat(-1)? == 1)
    }

    pub fn set_looping(&self, looping: bool) -> ReapyResult<()> {
        self.repeat(looping as i32)?;
        Ok(())
    }

    fn repeat(&self, value: i32) -> ReapyResult<i32> {
        self.project
            .host()
            .call(Call::GetSetRepeatEx {
                project: self.project.id(),
                value,
            })?
            .into_int()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{mock::MockHost, ProjectId, Value};
    use float_eq::assert_float_eq;

    fn range(start: f64, end: f64) -> Value {
        Value::List(vec![Value::Float(start), Value::Float(end)])
    }

    fn pid() -> ProjectId {
        ProjectId::new(5).unwrap()
    }

    #[test]
    fn get_queries_without_setting() {
        let host = MockHost::new();
        host.push_value(range(1.0, 4.0));
        let ts = Project::from_id(&host, pid()).time_selection();
        assert_float_eq!(ts.length().unwrap(), 3.0, abs <= 1e-9);
        assert_eq!(
            host.calls(),
            vec![Call::GetSetLoopTimeRange2 {
                project: pid(),
                is_set: false,
                is_loop: false,
                start: 0.0,
                end: 0.0,
                allow_autoseek: false,
            }]
        );
    }

    #[test]
    fn set_start_keeps_end() {
        let host = MockHost::new();
        host.push_values([range(1.0, 4.0), range(2.0, 4.0)]);
        let ts = Project::from_id(&host, pid()).time_selection();
        ts.set_start(2.0).unwrap();
        assert_eq!(
            host.last_call(),
            Some(Call::GetSetLoopTimeRange2 {
                project: pid(),
                is_set: true,
                is_loop: false,
                start: 2.0,
                end: 4.0,
                allow_autoseek: false,
            })
        );
    }

    #[test]
    fn set_length_moves_end() {
        let host = MockHost::new();
        host.push_values([range(1.0, 4.0), range(1.0, 1.5)]);
        let ts = Project::from_id(&host, pid()).time_selection();
        ts.set_length(0.5).unwrap();
        assert!(matches!(
            host.last_call(),
            Some(Call::GetSetLoopTimeRange2 { start, end, .. })
                if start == 1.0 && end == 1.5
        ));
    }

    #[test]
    fn looping() {
        let host = MockHost::new();
        host.push_values([Value::Int(1), Value::Int(0)]);
        let ts = Project::from_id(&host, pid()).time_selection();
        assert!(ts.is_looping().unwrap());
        ts.set_looping(false).unwrap();
        assert_eq!(
            host.calls(),
            vec![
                Call::GetSetRepeatEx {
                    project: pid(),
                    value: -1
                },
                Call::GetSetRepeatEx {
                    project: pid(),
                    value: 0
                },
            ]
        );
    }
}
