//! CLI argument surface: one long flag per `Options` field, mirroring the
//! teacher's `Cli` struct in `src/main.rs`.

use clap::Parser;

use crate::options::{FlagBitsMap, Options};
use crate::value::Value;

#[derive(Parser)]
#[command(name = "apacheconfig")]
#[command(about = "Parse Apache-style / Config::General configuration files to JSON")]
#[command(version)]
pub struct Cli {
    /// Configuration file(s) to load and merge in order.
    #[arg(required = true)]
    pub files: Vec<String>,

    #[arg(long)]
    pub allowmultioptions: bool,
    #[arg(long)]
    pub no_allowmultioptions: bool,

    #[arg(long)]
    pub forcearray: bool,

    #[arg(long)]
    pub lowercasenames: bool,

    #[arg(long)]
    pub useapacheinclude: bool,
    #[arg(long)]
    pub no_useapacheinclude: bool,

    #[arg(long)]
    pub includeagain: bool,

    #[arg(long)]
    pub includerelative: bool,

    #[arg(long)]
    pub includedirectories: bool,

    #[arg(long)]
    pub includeglob: bool,

    /// May be repeated: `--configpath a --configpath b`.
    #[arg(long)]
    pub configpath: Vec<String>,

    #[arg(long)]
    pub mergeduplicateblocks: bool,

    #[arg(long)]
    pub mergeduplicateoptions: bool,

    #[arg(long)]
    pub autotrue: bool,

    /// JSON object: `{"optName": {"flagName": "flagValue", ...}, ...}`.
    #[arg(long)]
    pub flagbits: Option<String>,

    /// JSON object merged underneath the loaded tree.
    #[arg(long)]
    pub defaultconfig: Option<String>,

    #[arg(long)]
    pub interpolatevars: bool,

    #[arg(long)]
    pub interpolateenv: bool,

    #[arg(long)]
    pub allowsinglequoteinterpolation: bool,

    #[arg(long)]
    pub strictvars: bool,
    #[arg(long)]
    pub no_strictvars: bool,

    #[arg(long)]
    pub ccomments: bool,
    #[arg(long)]
    pub no_ccomments: bool,

    #[arg(long)]
    pub nostripvalues: bool,
    #[arg(long)]
    pub no_nostripvalues: bool,

    #[arg(long)]
    pub noescape: bool,

    #[arg(long)]
    pub namedblocks: bool,
    #[arg(long)]
    pub no_namedblocks: bool,

    /// Read the first file as a previously-dumped JSON tree instead of
    /// configuration text, re-dump it, and print the rendered text as a
    /// JSON string instead of the parsed tree.
    #[arg(long)]
    pub json_input: bool,
}

impl Cli {
    /// Builds `Options` from the flags, applying each `--no-*` override on
    /// top of the documented default for flags that default to `true`.
    pub fn to_options(&self) -> Result<Options, String> {
        let flagbits = match &self.flagbits {
            Some(raw) => parse_flagbits(raw)?,
            None => FlagBitsMap::new(),
        };
        let defaultconfig = match &self.defaultconfig {
            Some(raw) => {
                let json: serde_json::Value =
                    serde_json::from_str(raw).map_err(|e| format!("invalid --defaultconfig JSON: {e}"))?;
                Some(Value::from_serde_json(json))
            }
            None => None,
        };

        Ok(Options::new()
            .with_allowmultioptions(self.allowmultioptions || !self.no_allowmultioptions)
            .with_forcearray(self.forcearray)
            .with_lowercasenames(self.lowercasenames)
            .with_useapacheinclude(self.useapacheinclude || !self.no_useapacheinclude)
            .with_includeagain(self.includeagain)
            .with_includerelative(self.includerelative)
            .with_includedirectories(self.includedirectories)
            .with_includeglob(self.includeglob)
            .with_configpath(self.configpath.clone())
            .with_mergeduplicateblocks(self.mergeduplicateblocks)
            .with_mergeduplicateoptions(self.mergeduplicateoptions)
            .with_autotrue(self.autotrue)
            .with_flagbits(flagbits)
            .with_interpolatevars(self.interpolatevars)
            .with_interpolateenv(self.interpolateenv)
            .with_allowsinglequoteinterpolation(self.allowsinglequoteinterpolation)
            .with_strictvars(self.strictvars || !self.no_strictvars)
            .with_ccomments(self.ccomments || !self.no_ccomments)
            .with_nostripvalues(self.nostripvalues || !self.no_nostripvalues)
            .with_noescape(self.noescape)
            .with_namedblocks(self.namedblocks || !self.no_namedblocks)
            .with_defaultconfig_opt(defaultconfig))
    }
}

fn parse_flagbits(raw: &str) -> Result<FlagBitsMap, String> {
    let json: serde_json::Value = serde_json::from_str(raw).map_err(|e| format!("invalid --flagbits JSON: {e}"))?;
    let obj = json.as_object().ok_or("--flagbits must be a JSON object")?;
    let mut map = FlagBitsMap::new();
    for (opt_name, flags) in obj {
        let flags_obj = flags.as_object().ok_or("--flagbits values must be JSON objects")?;
        let mut inner = indexmap::IndexMap::new();
        for (flag_name, flag_value) in flags_obj {
            let value = flag_value.as_str().ok_or("--flagbits flag values must be strings")?;
            inner.insert(flag_name.clone(), value.to_string());
        }
        map.insert(opt_name.clone(), inner);
    }
    Ok(map)
}
