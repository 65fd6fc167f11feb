use std::env;

use lv2_config::HostConfig;

fn main() -> anyhow::Result<()> {
    let path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: evaluate_file <config.yaml> [name=value ...]"))?;

    // Extra arguments bind environment variables, e.g. `trim=-3`.
    let mut config = HostConfig::new();
    for binding in env::args().skip(2) {
        let (name, value) = binding
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected name=value, got '{binding}'"))?;
        config.set_variable(name, value);
    }

    config.load_file(&path)?;
    if let Err(err) = config.evaluate() {
        eprintln!("[{:?}] {err}", err.kind());
        std::process::exit(1);
    }

    for plugin in config.plugins() {
        println!("{}", plugin.uri());
        for (name, text) in plugin.formatted() {
            let value = plugin.value(name).unwrap_or(f64::NAN);
            println!("  {name:<12} {text:<32} {value}");
        }
    }
    Ok(())
}
