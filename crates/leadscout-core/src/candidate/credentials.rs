//! Healthcare credential extraction
//!
//! Three independent pattern tables (certifications, licenses, specialties).
//! Every pattern is case-insensitive and wrapped in word boundaries so that
//! `ICU` never fires inside `NICU` and `RN` never fires inside `RNC-OB`.
//! Labels are deduplicated and listed in order of first appearance.

use super::CredentialProfile;
use lazy_static::lazy_static;
use regex::Regex;

/// (label, alternation) pairs; the alternation is wrapped as `(?i)\b(?:...)\b`
type PatternTable = &'static [(&'static str, &'static str)];

const CERTIFICATIONS: PatternTable = &[
    ("BLS", r"BLS|Basic Life Support"),
    ("ACLS", r"ACLS|Advanced Cardi(?:ac|ovascular) Life Support"),
    ("PALS", r"PALS|Pediatric Advanced Life Support"),
    ("NRP", r"NRP|Neonatal Resuscitation(?: Program)?"),
    ("TNCC", r"TNCC|Trauma Nursing Core Course"),
    ("ENPC", r"ENPC"),
    ("CCRN", r"CCRN"),
    ("CEN", r"CEN|Certified Emergency Nurse"),
    ("CPEN", r"CPEN"),
    ("PCCN", r"PCCN"),
    ("CNOR", r"CNOR"),
    ("OCN", r"OCN"),
    ("CMSRN", r"CMSRN"),
    ("RNC-OB", r"RNC-OB"),
    ("NIHSS", r"NIHSS"),
    ("CPR", r"CPR"),
];

const LICENSES: PatternTable = &[
    ("RN", r"RN|Registered Nurse"),
    ("LPN", r"LPN|Licensed Practical Nurse"),
    ("LVN", r"LVN|Licensed Vocational Nurse"),
    ("APRN", r"APRN"),
    ("NP", r"NP|Nurse Practitioner"),
    ("FNP", r"FNP(?:-BC|-C)?|Family Nurse Practitioner"),
    ("CRNA", r"CRNA|Nurse Anesthetist"),
    ("CNM", r"CNM|Nurse Midwife"),
    ("CNA", r"CNA|Certified Nursing Assistant"),
    ("PA-C", r"PA-C|Physician Assistant"),
    ("RRT", r"RRT|Registered Respiratory Therapist"),
    ("BSN", r"BSN"),
    ("MSN", r"MSN"),
    ("DNP", r"DNP"),
];

const SPECIALTIES: PatternTable = &[
    ("ICU", r"ICU|Intensive Care Unit|Critical Care"),
    ("NICU", r"NICU|Neonatal Intensive Care"),
    ("PICU", r"PICU|Pediatric Intensive Care"),
    ("CVICU", r"CVICU|Cardiovascular Intensive Care"),
    ("ER", r"(?-i:ER)|Emergency(?: Room| Department| Medicine| Nursing)?"),
    ("Med-Surg", r"Med[-/ ]?Surg|Medical[- ]Surgical"),
    ("L&D", r"L&D|Labor (?:and|&) Delivery"),
    ("OR", r"Operating Room|Perioperative"),
    ("Telemetry", r"Telemetry"),
    ("Oncology", r"Oncology"),
    ("Pediatrics", r"Pediatrics|Peds"),
    ("Cardiac", r"Cardiac|Cardiology|Cath Lab"),
    ("Dialysis", r"Dialysis|Nephrology"),
    ("Home Health", r"Home Health|Home Care"),
    ("Psychiatric", r"Psychiatric|Psych|Behavioral Health|Mental Health"),
    ("Hospice", r"Hospice|Palliative"),
    ("Geriatrics", r"Geriatrics?|Long[- ]Term Care"),
    ("Travel", r"Travel Nurs(?:e|ing)"),
];

struct CompiledPattern {
    label: &'static str,
    regex: Regex,
}

fn compile(table: PatternTable) -> Vec<CompiledPattern> {
    table
        .iter()
        .map(|(label, alternation)| CompiledPattern {
            label,
            regex: Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).unwrap(),
        })
        .collect()
}

lazy_static! {
    static ref CERTIFICATION_PATTERNS: Vec<CompiledPattern> = compile(CERTIFICATIONS);
    static ref LICENSE_PATTERNS: Vec<CompiledPattern> = compile(LICENSES);
    static ref SPECIALTY_PATTERNS: Vec<CompiledPattern> = compile(SPECIALTIES);
}

/// Scan text for licenses, certifications and specialty keywords
pub fn extract_credentials(text: &str) -> CredentialProfile {
    CredentialProfile {
        certifications: match_table(&CERTIFICATION_PATTERNS, text),
        licenses: match_table(&LICENSE_PATTERNS, text),
        specialty: match_table(&SPECIALTY_PATTERNS, text),
    }
}

fn match_table(patterns: &[CompiledPattern], text: &str) -> Option<String> {
    let mut hits: Vec<(usize, usize, &'static str)> = patterns
        .iter()
        .enumerate()
        .filter_map(|(rank, p)| p.regex.find(text).map(|m| (m.start(), rank, p.label)))
        .collect();

    if hits.is_empty() {
        return None;
    }

    hits.sort_unstable();
    let mut labels: Vec<&str> = Vec::with_capacity(hits.len());
    for (_, _, label) in hits {
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    Some(labels.join(", "))
}
