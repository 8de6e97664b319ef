/// 연락처 전화번호 난독화
/// 스크래핑 방지용 표시 처리일 뿐이며 접근 제어 수단이 아니다.
/// 누구나 reveal로 원문을 복원할 수 있다.
use crate::error::ServiceError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// 문자열을 뒤집은 뒤 base64 인코딩
pub fn obfuscate(phone: &str) -> String {
    let reversed: String = phone.chars().rev().collect();
    STANDARD.encode(reversed)
}

pub fn reveal(encoded: &str) -> Result<String, ServiceError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ServiceError::MalformedInput(e.to_string()))?;
    let reversed =
        String::from_utf8(bytes).map_err(|e| ServiceError::MalformedInput(e.to_string()))?;
    Ok(reversed.chars().rev().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obfuscated_phone_does_not_contain_digits_in_order() {
        let encoded = obfuscate("(555) 123-4567");
        assert!(!encoded.contains("555"));
        assert_eq!(reveal(&encoded).unwrap(), "(555) 123-4567");
    }

    #[test]
    fn reveal_rejects_garbage() {
        assert!(matches!(
            reveal("not base64!"),
            Err(ServiceError::MalformedInput(_))
        ));
    }
}
