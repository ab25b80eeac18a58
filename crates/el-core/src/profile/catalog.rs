//! Choices offered by the profile form.
//!
//! These are presentation hints; the store accepts any non-empty department.

/// Department code and display label.
pub const DEPARTMENTS: &[(&str, &str)] = &[
    ("CSE", "Computer Science and Engineering (CSE)"),
    ("CyberSecurity", "CSE (Cyber Security)"),
    ("AIDS", "Artificial Intelligence and Data Science"),
    ("AIML", "Artificial Intelligence and Machine Learning"),
    ("ECE", "Electronics and Communication Engineering (ECE)"),
    ("VLSI", "Electronics Engineering (VLSI Design & Technology)"),
    ("EEE", "Electrical and Electronics Engineering (EEE)"),
    ("IT", "Information Technology (IT)"),
    ("MECH", "Mechanical Engineering"),
    ("CIVIL", "Civil Engineering"),
    ("AGRI", "Agricultural Engineering"),
    ("BIOMED", "Biomedical Engineering"),
    ("BIOTECH", "Biotechnology"),
    ("FOOD", "Food Technology"),
];

pub const ACADEMIC_YEARS: &[&str] = &["2022-2026", "2023-2027", "2024-2028", "2025-2029"];

pub fn department_label(code: &str) -> Option<&'static str> {
    DEPARTMENTS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}
