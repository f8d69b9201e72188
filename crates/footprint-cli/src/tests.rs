use super::*;

#[test]
fn parses_build_command() {
    let cli = Cli::try_parse_from(["footprint-cli", "build"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Build));
}

#[test]
fn parses_brand_search_with_default_output() {
    let cli = Cli::try_parse_from([
        "footprint-cli",
        "brand-search",
        "--region",
        "US-CA",
        "--pattern",
        "Acme|ACME",
    ])
    .expect("expected valid cli args");

    let Commands::BrandSearch {
        region,
        pattern,
        output,
        timeout_secs,
    } = cli.command
    else {
        panic!("expected brand-search");
    };
    assert_eq!(region, "US-CA");
    assert_eq!(pattern, "Acme|ACME");
    assert_eq!(output, PathBuf::from("out/brand_search.json"));
    assert_eq!(timeout_secs, None);
}

#[test]
fn brand_search_requires_region() {
    let result = Cli::try_parse_from(["footprint-cli", "brand-search", "--pattern", "Acme"]);
    assert!(result.is_err());
}

#[test]
fn parses_decode_with_postcode() {
    let cli = Cli::try_parse_from([
        "footprint-cli",
        "decode",
        "GV4M+J4",
        "--postcode",
        "SE1 9SG",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Decode { ref code, postcode: Some(ref p) } if code == "GV4M+J4" && p == "SE1 9SG"
    ));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["footprint-cli"]).is_err());
}
