//! lilotracker main entrypoint.

use lilotracker::run;
use lilotracker::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
