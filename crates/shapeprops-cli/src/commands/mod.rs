pub mod conformers;
pub mod props;

use crate::utils::progress::CliProgressHandler;
use shapeprops::engine::progress::ProgressReporter;

fn reporter(show_progress: bool) -> ProgressReporter<'static> {
    let handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    ProgressReporter::with_callback(handler.get_callback())
}
