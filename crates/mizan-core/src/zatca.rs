//! # ZATCA TLV Encoder
//!
//! Encodes the five mandatory simplified-invoice fields into the ZATCA
//! Tag-Length-Value binary format and Base64-serializes the result for
//! embedding in a QR code.
//!
//! ## Wire Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Each field:  [tag: 1 byte][length: 1 byte][value: UTF-8 bytes]     │
//! │  Fields concatenated in ascending tag order, then Base64 as a whole │
//! │                                                                     │
//! │  Tag 1  Seller name            "Mizan Store" / "متجر الميزان"       │
//! │  Tag 2  VAT registration no.   "310122393500003"                    │
//! │  Tag 3  Invoice timestamp      "2026-03-14T09:26:53Z"               │
//! │  Tag 4  Total (incl. VAT)      "103.50"                             │
//! │  Tag 5  VAT amount             "13.50"                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The length byte is the UTF-8 BYTE length of the value, not the
//! character count — an Arabic seller name occupies roughly two bytes per
//! character and any decoder that counts characters will misparse the
//! remaining tags.
//!
//! Encoding is pure and deterministic: identical input yields a
//! byte-identical payload. Rendering the Base64 string into QR imagery is
//! an external concern.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::EncodingError;
use crate::types::ZatcaInvoiceData;

// =============================================================================
// Tags
// =============================================================================

/// ZATCA simplified-invoice tag numbers.
pub mod tag {
    pub const SELLER_NAME: u8 = 1;
    pub const VAT_NUMBER: u8 = 2;
    pub const TIMESTAMP: u8 = 3;
    pub const INVOICE_TOTAL: u8 = 4;
    pub const VAT_AMOUNT: u8 = 5;
}

// =============================================================================
// Encoding
// =============================================================================

/// Encodes invoice data into the Base64 TLV payload.
///
/// Fails with [`EncodingError::MissingField`] if any mandatory field is
/// empty; checkout must not reach its payment-success state without a
/// valid payload.
///
/// ## Example
/// ```rust
/// use mizan_core::money::Money;
/// use mizan_core::types::ZatcaInvoiceData;
/// use mizan_core::zatca;
///
/// let data = ZatcaInvoiceData {
///     invoice_id: "INV-1".into(),
///     seller_name: "Mizan Store".into(),
///     vat_number: "310122393500003".into(),
///     issued_at: "2026-03-14T09:26:53Z".into(),
///     total: Money::from_halalas(10350),
///     vat: Money::from_halalas(1350),
/// };
///
/// let payload = zatca::encode(&data).unwrap();
/// let fields = zatca::decode(&payload).unwrap();
/// assert_eq!(fields[0], (1, "Mizan Store".to_string()));
/// assert_eq!(fields[3], (4, "103.50".to_string()));
/// ```
pub fn encode(data: &ZatcaInvoiceData) -> Result<String, EncodingError> {
    let total = data.total.to_decimal_string();
    let vat = data.vat.to_decimal_string();

    let mut buf = Vec::with_capacity(
        data.seller_name.len() + data.vat_number.len() + data.issued_at.len() + 32,
    );

    push_tlv(&mut buf, tag::SELLER_NAME, "seller_name", &data.seller_name)?;
    push_tlv(&mut buf, tag::VAT_NUMBER, "vat_number", &data.vat_number)?;
    push_tlv(&mut buf, tag::TIMESTAMP, "issued_at", &data.issued_at)?;
    push_tlv(&mut buf, tag::INVOICE_TOTAL, "total", &total)?;
    push_tlv(&mut buf, tag::VAT_AMOUNT, "vat", &vat)?;

    Ok(BASE64.encode(buf))
}

/// Appends one `[tag][len][value]` field to the buffer.
fn push_tlv(
    buf: &mut Vec<u8>,
    tag: u8,
    field: &'static str,
    value: &str,
) -> Result<(), EncodingError> {
    if value.trim().is_empty() {
        return Err(EncodingError::MissingField { field, tag });
    }

    let bytes = value.as_bytes();
    if bytes.len() > u8::MAX as usize {
        return Err(EncodingError::ValueTooLong {
            field,
            tag,
            len: bytes.len(),
        });
    }

    buf.push(tag);
    buf.push(bytes.len() as u8);
    buf.extend_from_slice(bytes);
    Ok(())
}

// =============================================================================
// Decoding
// =============================================================================

/// Parses a Base64 TLV payload back into `(tag, value)` pairs.
///
/// Any conformant decoder must recover the original five fields
/// byte-for-byte; this one backs the round-trip tests and lets support
/// staff inspect a QR payload from a disputed receipt.
pub fn decode(payload: &str) -> Result<Vec<(u8, String)>, EncodingError> {
    let bytes = BASE64
        .decode(payload)
        .map_err(|e| EncodingError::InvalidBase64(e.to_string()))?;

    let mut fields = Vec::new();
    let mut pos = 0usize;

    while pos < bytes.len() {
        if pos + 2 > bytes.len() {
            return Err(EncodingError::MalformedPayload(format!(
                "truncated header at byte {pos}"
            )));
        }

        let tag = bytes[pos];
        let len = bytes[pos + 1] as usize;
        pos += 2;

        if pos + len > bytes.len() {
            return Err(EncodingError::MalformedPayload(format!(
                "tag {tag} declares {len} bytes but only {} remain",
                bytes.len() - pos
            )));
        }

        let value = std::str::from_utf8(&bytes[pos..pos + len])
            .map_err(|e| EncodingError::MalformedPayload(format!("tag {tag}: {e}")))?
            .to_string();
        fields.push((tag, value));
        pos += len;
    }

    Ok(fields)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn sample(seller: &str) -> ZatcaInvoiceData {
        ZatcaInvoiceData {
            invoice_id: "INV-20260314092653001".to_string(),
            seller_name: seller.to_string(),
            vat_number: "310122393500003".to_string(),
            issued_at: "2026-03-14T09:26:53Z".to_string(),
            total: Money::from_halalas(10350),
            vat: Money::from_halalas(1350),
        }
    }

    #[test]
    fn test_round_trip_ascii() {
        let data = sample("Mizan Store");
        let fields = decode(&encode(&data).unwrap()).unwrap();

        assert_eq!(
            fields,
            vec![
                (1, "Mizan Store".to_string()),
                (2, "310122393500003".to_string()),
                (3, "2026-03-14T09:26:53Z".to_string()),
                (4, "103.50".to_string()),
                (5, "13.50".to_string()),
            ]
        );
    }

    #[test]
    fn test_round_trip_arabic_seller_name() {
        let data = sample("متجر الميزان للتجزئة");
        let fields = decode(&encode(&data).unwrap()).unwrap();
        assert_eq!(fields[0], (1, "متجر الميزان للتجزئة".to_string()));
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn test_length_byte_is_utf8_byte_count() {
        let seller = "متجر"; // 4 chars, 8 UTF-8 bytes
        let data = sample(seller);
        let raw = BASE64.decode(encode(&data).unwrap()).unwrap();

        assert_eq!(raw[0], 1);
        assert_eq!(raw[1], seller.len() as u8);
        assert_eq!(raw[1], 8);
        assert_ne!(raw[1] as usize, seller.chars().count());
    }

    #[test]
    fn test_tags_ascend() {
        let fields = decode(&encode(&sample("Mizan Store")).unwrap()).unwrap();
        let tags: Vec<u8> = fields.iter().map(|(t, _)| *t).collect();
        assert_eq!(tags, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_deterministic() {
        let data = sample("Mizan Store");
        assert_eq!(encode(&data).unwrap(), encode(&data).unwrap());
    }

    #[test]
    fn test_empty_field_rejected() {
        let mut data = sample("Mizan Store");
        data.vat_number = "  ".to_string();
        assert!(matches!(
            encode(&data),
            Err(EncodingError::MissingField { tag: 2, .. })
        ));
    }

    #[test]
    fn test_oversized_field_rejected() {
        let mut data = sample("Mizan Store");
        data.seller_name = "x".repeat(256);
        assert!(matches!(
            encode(&data),
            Err(EncodingError::ValueTooLong { tag: 1, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let data = sample("Mizan Store");
        let mut raw = BASE64.decode(encode(&data).unwrap()).unwrap();
        raw.truncate(raw.len() - 3);
        assert!(decode(&BASE64.encode(raw)).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_base64() {
        assert!(matches!(
            decode("not base64!!!"),
            Err(EncodingError::InvalidBase64(_))
        ));
    }
}
