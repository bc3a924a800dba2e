#![no_main]
use access_rs::{AccessConfig, PredicateRegistry, Rule};
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must never panic the JSON/TOML rule loaders
fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };

    let mut registry = PredicateRegistry::new();
    registry.register("always", |_| Ok(true));

    let _ = Rule::from_json(source, &registry);
    let _ = Rule::from_toml(source, &registry);

    if let Ok(config) = AccessConfig::from_toml_str(source) {
        let _ = config.rule(&registry);
    }
});
