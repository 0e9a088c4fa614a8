use anyhow::Context;
use argh::FromArgs;
use decimal_calculator::{
    AutoSaveObserver, Calculator, CalculatorConfig, Interpreter, LoggingObserver, init_logging,
};
use std::path::PathBuf;
use std::rc::Rc;

#[derive(FromArgs)]
/// Interactive decimal calculator with undo/redo and CSV history.
struct Args {
    #[argh(option)]
    /// directory holding the logs/ and history/ folders; overrides CALCULATOR_BASE_DIR
    base_dir: Option<PathBuf>,

    #[argh(switch)]
    /// do not save the history after every calculation
    no_auto_save: bool,
}

fn main() -> anyhow::Result<()> {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();
    let args: Args = argh::from_env();

    let mut config = CalculatorConfig::from_env().context("invalid calculator configuration")?;
    if let Some(base_dir) = args.base_dir {
        config = config.with_base_dir(base_dir);
    }
    if args.no_auto_save {
        config.auto_save = false;
    }

    init_logging(&config).context("failed to initialise logging")?;

    let mut calculator = Calculator::new(config).context("failed to start calculator")?;
    calculator.add_observer(Rc::new(LoggingObserver));
    calculator.add_observer(Rc::new(AutoSaveObserver));

    Interpreter::with_default_commands(calculator).repl()
}
