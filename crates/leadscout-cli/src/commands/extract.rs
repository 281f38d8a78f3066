//! Extract command

use crate::app::{ExtractArgs, OutputFormat};
use anyhow::Result;
use leadscout_core::extract_credentials;
use std::io::Read;

pub fn run(args: ExtractArgs, format: OutputFormat) -> Result<()> {
    let text = if args.text.is_empty() {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        args.text.join(" ")
    };

    let profile = extract_credentials(&text);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        _ => {
            println!("Licenses:        {}", profile.licenses.as_deref().unwrap_or("-"));
            println!("Certifications:  {}", profile.certifications.as_deref().unwrap_or("-"));
            println!("Specialty:       {}", profile.specialty.as_deref().unwrap_or("-"));
        }
    }
    Ok(())
}
