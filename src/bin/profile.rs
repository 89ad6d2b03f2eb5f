use mazecarve::{
    app::App,
    config::{Config, Mode},
    logging,
};

fn main() -> anyhow::Result<()> {
    let _guard = logging::init(None, true)?;

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);

    let app = App::new(Config {
        cols: 255,
        rows: 255,
        seed: Some(0),
        mode: Mode::Headless,
        ..Config::default()
    });
    let total = app.profile(num_iters)?;
    println!("{} iterations in {:?}", num_iters, total);
    Ok(())
}
