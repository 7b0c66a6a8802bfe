//! check-digit validation for brazilian national identifiers
//!
//! CPF (11-digit personal id) and CNPJ (14-digit organizational id). Pure
//! functions, no I/O; the algorithm to run is selected by digit count alone.

use serde::{Deserialize, Serialize};

use crate::errors::{LoanError, Result};

/// identifier kind, classified by digit count of the cleaned input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Cpf,
    Cnpj,
}

impl DocumentKind {
    /// classify a raw candidate by its digit count (11 or 14)
    pub fn classify(raw: &str) -> Result<DocumentKind> {
        match strip_non_digits(raw).len() {
            11 => Ok(DocumentKind::Cpf),
            14 => Ok(DocumentKind::Cnpj),
            len => Err(LoanError::InvalidDocument {
                message: format!("expected 11 or 14 digits, found {}", len),
            }),
        }
    }
}

/// drop punctuation and whitespace, keeping only ascii digits
pub fn strip_non_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// validate a candidate identifier, dispatching on digit count
pub fn is_valid(raw: &str) -> bool {
    match strip_non_digits(raw).len() {
        11 => is_valid_cpf(raw),
        14 => is_valid_cnpj(raw),
        _ => false,
    }
}

/// validate an 11-digit CPF
///
/// Two check digits over descending positional weights (10..=2 for the first,
/// 11..=2 for the second), each computed as ((sum * 10) % 11) % 10.
pub fn is_valid_cpf(raw: &str) -> bool {
    let digits = to_digits(raw);
    if digits.len() != 11 {
        return false;
    }
    if all_identical(&digits) {
        return false;
    }

    for check_pos in [9usize, 10] {
        let sum: u32 = digits[..check_pos]
            .iter()
            .enumerate()
            .map(|(i, &d)| d * (check_pos as u32 + 1 - i as u32))
            .sum();
        let digit = ((sum * 10) % 11) % 10;
        if digit != digits[check_pos] {
            return false;
        }
    }
    true
}

/// validate a 14-digit CNPJ
///
/// Two fixed weight vectors; each check digit is 11 - (sum % 11), clamped to
/// 0 when the raw result reaches 10.
pub fn is_valid_cnpj(raw: &str) -> bool {
    const WEIGHTS_FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const WEIGHTS_SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let digits = to_digits(raw);
    if digits.len() != 14 {
        return false;
    }
    if all_identical(&digits) {
        return false;
    }

    let checks: [(&[u32], usize); 2] = [(&WEIGHTS_FIRST, 12), (&WEIGHTS_SECOND, 13)];
    for (weights, check_pos) in checks {
        let sum: u32 = digits[..check_pos]
            .iter()
            .zip(weights)
            .map(|(&d, &w)| d * w)
            .sum();
        let mut digit = 11 - (sum % 11);
        if digit >= 10 {
            digit = 0;
        }
        if digit != digits[check_pos] {
            return false;
        }
    }
    true
}

/// validate a CPF and render it as XXX.XXX.XXX-XX
pub fn format_cpf(raw: &str) -> Result<String> {
    let digits = strip_non_digits(raw);
    if !is_valid_cpf(&digits) {
        return Err(LoanError::InvalidDocument {
            message: format!("not a valid CPF: {}", raw),
        });
    }
    Ok(format!(
        "{}.{}.{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..]
    ))
}

/// canonical form of a valid document: formatted CPF or bare 14-digit CNPJ
pub fn canonicalize(raw: &str) -> Result<String> {
    match DocumentKind::classify(raw)? {
        DocumentKind::Cpf => format_cpf(raw),
        DocumentKind::Cnpj => {
            let digits = strip_non_digits(raw);
            if !is_valid_cnpj(&digits) {
                return Err(LoanError::InvalidDocument {
                    message: format!("not a valid CNPJ: {}", raw),
                });
            }
            Ok(digits)
        }
    }
}

fn to_digits(raw: &str) -> Vec<u32> {
    raw.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_identical(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_CPF: &str = "111.444.777-35";
    const VALID_CNPJ: &str = "11.222.333/0001-81";

    #[test]
    fn test_strip_non_digits() {
        assert_eq!(strip_non_digits("111.444.777-35"), "11144477735");
        assert_eq!(strip_non_digits(" 11 222 333 / 0001 - 81 "), "11222333000181");
        assert_eq!(strip_non_digits("abc"), "");
    }

    #[test]
    fn test_valid_cpf_accepted() {
        assert!(is_valid_cpf(VALID_CPF));
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid(VALID_CPF));
    }

    #[test]
    fn test_repeated_digit_cpf_rejected() {
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid("000.000.000-00"));
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert!(!is_valid_cpf("1114447773"));
        assert!(!is_valid_cnpj("1122233300018"));
        assert!(!is_valid("123"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_single_digit_mutations_rejected() {
        let digits = strip_non_digits(VALID_CPF);
        for pos in 0..digits.len() {
            let mut mutated: Vec<char> = digits.chars().collect();
            let original = mutated[pos].to_digit(10).unwrap();
            mutated[pos] = char::from_digit((original + 1) % 10, 10).unwrap();
            let mutated: String = mutated.into_iter().collect();
            assert!(!is_valid_cpf(&mutated), "mutation at {} accepted", pos);
        }
    }

    #[test]
    fn test_valid_cnpj_accepted() {
        assert!(is_valid_cnpj(VALID_CNPJ));
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid(VALID_CNPJ));
    }

    #[test]
    fn test_repeated_digit_cnpj_rejected() {
        assert!(!is_valid_cnpj("11.111.111/1111-11"));
    }

    #[test]
    fn test_cnpj_mutations_rejected() {
        let digits = strip_non_digits(VALID_CNPJ);
        for pos in 0..digits.len() {
            let mut mutated: Vec<char> = digits.chars().collect();
            let original = mutated[pos].to_digit(10).unwrap();
            mutated[pos] = char::from_digit((original + 1) % 10, 10).unwrap();
            let mutated: String = mutated.into_iter().collect();
            assert!(!is_valid_cnpj(&mutated), "mutation at {} accepted", pos);
        }
    }

    #[test]
    fn test_format_cpf() {
        assert_eq!(format_cpf("11144477735").unwrap(), "111.444.777-35");
        assert_eq!(format_cpf(VALID_CPF).unwrap(), "111.444.777-35");

        assert!(matches!(
            format_cpf("111.444.777-36"),
            Err(LoanError::InvalidDocument { .. })
        ));
    }

    #[test]
    fn test_classify() {
        assert_eq!(DocumentKind::classify(VALID_CPF).unwrap(), DocumentKind::Cpf);
        assert_eq!(DocumentKind::classify(VALID_CNPJ).unwrap(), DocumentKind::Cnpj);
        assert!(DocumentKind::classify("12345").is_err());
    }

    #[test]
    fn test_canonicalize() {
        assert_eq!(canonicalize("11144477735").unwrap(), "111.444.777-35");
        assert_eq!(canonicalize(VALID_CNPJ).unwrap(), "11222333000181");
        assert!(canonicalize("11.111.111/1111-11").is_err());
    }
}
