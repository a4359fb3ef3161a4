/// Events emitted while a workflow runs.
///
/// Phases bracket the coarse pipeline steps (embedding, conformer search,
/// descriptor evaluation); tasks count work units inside a phase.
#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    PhaseStart { name: &'static str },
    PhaseFinish,

    TaskStart { total_steps: u64 },
    TaskIncrement,
    TaskFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}

impl std::fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn silent_reporter_ignores_events() {
        let reporter = ProgressReporter::new();
        reporter.report(Progress::Message("ignored".into()));
        assert_eq!(format!("{reporter:?}"), "ProgressReporter { has_callback: false }");
    }

    #[test]
    fn callback_receives_events_in_order() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|e| {
            events.lock().unwrap().push(e);
        }));
        reporter.report(Progress::PhaseStart { name: "work" });
        reporter.report(Progress::TaskIncrement);
        reporter.report(Progress::PhaseFinish);
        drop(reporter);

        assert_eq!(
            events.into_inner().unwrap(),
            vec![
                Progress::PhaseStart { name: "work" },
                Progress::TaskIncrement,
                Progress::PhaseFinish,
            ]
        );
    }
}
