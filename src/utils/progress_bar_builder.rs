use anyhow::Result;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

pub(crate) struct ProgressBarBuilder {
    style_template: &'static str,
    message: String,
    hidden: bool,
    enable_tick: bool,
}

impl ProgressBarBuilder {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            style_template: "{spinner:.green} {msg}",
            message: message.into(),
            hidden: false,
            enable_tick: false,
        }
    }

    pub(crate) fn with_template(mut self, template: &'static str) -> Self {
        self.style_template = template;
        self
    }

    pub(crate) fn with_tick(mut self) -> Self {
        self.enable_tick = true;
        self
    }

    pub(crate) fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub(crate) fn build(self) -> Result<ProgressBar> {
        let pb = ProgressBar::new_spinner();
        if self.hidden {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        pb.set_style(ProgressStyle::default_spinner().template(self.style_template)?);
        pb.set_message(self.message);

        if self.enable_tick && !self.hidden {
            pb.enable_steady_tick(Duration::from_millis(200));
        }

        Ok(pb)
    }
}
