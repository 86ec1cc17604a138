//! Terminal output for rockety
//!
//! Interactive terminals get `cliclack` steps, spinners and prompts; CI logs
//! and pipes get plain bracketed lines instead.
//!
//! ```rust,ignore
//! use rockety::ui::{self, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect().with_auto_yes(args.yes);
//! ui::intro(&ctx, "Rockety");
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Installing dependencies...");
//! spinner.stop("Dependencies installed");
//!
//! ui::outro_success(&ctx, "Done!");
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, outro_success, remark, step_info, step_ok, step_ok_detail, step_warn, step_warn_hint,
};
pub use progress::{DownloadProgress, TaskSpinner};
pub use prompts::confirm;
pub use theme::{init_theme, RocketyTheme};
