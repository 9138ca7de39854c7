use calmform::form::{ConsoleSink, FormOptions};
use calmform::page::PageError;
use calmform::showcase;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn run() -> Result<(), PageError> {
    let controller = showcase::controller(FormOptions::default())?;
    let (mut page, bindings) = showcase::build_page(&controller)?;
    let sink = ConsoleSink::new().pretty(true);

    println!("{}", page.outline(&controller)?);

    info!("submitting untouched form");
    let _ = controller.submit(&sink)?;
    println!("{}", page.outline(&controller)?);

    let scheme = page.color_scheme.toggle();
    info!(%scheme, "color scheme toggled");

    let _ = bindings.autocomplete.change("React".to_string())?;
    let _ = bindings.json_input.change(r#"{"name":"calmform"}"#.to_string())?;
    bindings.json_input.blur()?;
    info!("submitting form with autocomplete filled");
    let _ = controller.submit(&sink)?;
    println!("{}", page.outline(&controller)?);
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("showcase failed: {err}");
        std::process::exit(1);
    }
}
