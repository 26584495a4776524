use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use codespan_reporting::term::{self, Config, DisplayStyle};
use quill_common::message::Messages;

/// Renders diagnostics to stderr.
pub struct ConsoleReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: Config,
}

impl ConsoleReporter {
    pub fn new(files: SimpleFiles<String, String>) -> Self {
        Self {
            files,
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: Config {
                display_style: DisplayStyle::Rich,
                ..Default::default()
            },
        }
    }

    pub fn report(&mut self, messages: Messages) -> Result<(), codespan_reporting::files::Error> {
        for msg in messages.msgs {
            term::emit(&mut self.writer, &self.config, &self.files, &msg)?;
        }

        Ok(())
    }
}
