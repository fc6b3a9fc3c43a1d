//! Typed value codec
//!
//! Renders leaf values as cell text and parses edited text back into the
//! existing value. Composite values (keys, creatables, colors, vectors,
//! quaternions) go through PRC markup; everything else is a plain scalar.

use void_prc::writer::PREAMBLE_LINES;
use void_prc::{PrcParser, PrcSerializable, PrcWriter};
use void_sdl::{SdlValue, VarType, Variable};

use crate::error::EditError;

/// Type column text for records
pub const RECORD_TYPE: &str = "STATEDESC";

/// Tag rendered for an empty CREATABLE slot
pub const NULL_CREATABLE_TAG: &str = "plNull";

/// Whether a declared type has a text mapping
pub fn is_text_mapped(var_type: VarType) -> bool {
    matches!(
        var_type,
        VarType::Bool
            | VarType::Int
            | VarType::Byte
            | VarType::Float
            | VarType::Double
            | VarType::String
            | VarType::Char
            | VarType::Key
            | VarType::Creatable
            | VarType::Rgb8
            | VarType::Rgba8
            | VarType::Rgb
            | VarType::Rgba
            | VarType::Vector3
            | VarType::Point3
            | VarType::Quaternion
    )
}

/// Diagnostic shown in place of a value with no text mapping
pub fn unhandled(var_type: VarType) -> String {
    format!("Unhandled SDL Var Type ({})", var_type.code())
}

/// Type column text for a variable: `INT[3]` or `STRING[]`
pub fn variable_type_text(var: &Variable) -> String {
    let name = var.descriptor().var_type.name();
    if var.is_variable_length() {
        format!("{}[]", name)
    } else {
        format!("{}[{}]", name, var.count())
    }
}

/// Render a value as cell text
pub fn render(value: &SdlValue) -> String {
    match value {
        SdlValue::Bool(true) => "True".to_string(),
        SdlValue::Bool(false) => "False".to_string(),
        SdlValue::Int(v) => v.to_string(),
        SdlValue::Byte(v) => v.to_string(),
        SdlValue::Float(v) => v.to_string(),
        SdlValue::Double(v) => v.to_string(),
        SdlValue::String(v) => v.clone(),
        SdlValue::Char(v) => char::from(*v).to_string(),
        SdlValue::Key(v) => render_prc(v),
        SdlValue::Creatable(Some(v)) => render_prc(v.as_ref()),
        SdlValue::Creatable(None) => {
            let mut prc = PrcWriter::new();
            prc.start_tag(NULL_CREATABLE_TAG);
            prc.end_tag(true);
            strip_preamble(&prc.into_string())
        }
        SdlValue::Rgb8(v) | SdlValue::Rgba8(v) => render_prc(v),
        SdlValue::Rgb(v) | SdlValue::Rgba(v) => render_prc(v),
        SdlValue::Vector3(v) | SdlValue::Point3(v) => render_prc(v),
        SdlValue::Quaternion(v) => render_prc(v),
        other => unhandled(other.var_type()),
    }
}

/// Write a composite as markup and keep only the body
pub fn render_prc<T: PrcSerializable + ?Sized>(value: &T) -> String {
    let mut prc = PrcWriter::new();
    value.prc_write(&mut prc);
    strip_preamble(&prc.into_string())
}

/// Drop the preamble lines and join what remains
fn strip_preamble(document: &str) -> String {
    document.split('\n').skip(PREAMBLE_LINES).collect()
}

/// Parse `text` into `value`, keeping its type.
///
/// On error `value` is left untouched.
pub fn parse_into(value: &mut SdlValue, text: &str) -> Result<(), EditError> {
    match value {
        SdlValue::Bool(v) => {
            *v = match text {
                "True" => true,
                "False" => false,
                _ => return Err(EditError::InvalidBool(text.to_string())),
            };
        }
        SdlValue::Int(v) => {
            *v = text
                .trim()
                .parse()
                .map_err(|_| EditError::InvalidInteger(text.to_string()))?;
        }
        SdlValue::Byte(v) => {
            let wide: i64 = text
                .trim()
                .parse()
                .map_err(|_| EditError::InvalidInteger(text.to_string()))?;
            *v = u8::try_from(wide).map_err(|_| EditError::ByteOutOfRange(text.to_string()))?;
        }
        SdlValue::Float(v) => {
            *v = parse_float::<f32>(text)?;
        }
        SdlValue::Double(v) => {
            *v = parse_float::<f64>(text)?;
        }
        SdlValue::String(v) => {
            *v = text.to_string();
        }
        SdlValue::Char(v) => {
            *v = parse_latin1_char(text)?;
        }
        SdlValue::Key(_)
        | SdlValue::Creatable(_)
        | SdlValue::Rgb8(_)
        | SdlValue::Rgba8(_)
        | SdlValue::Rgb(_)
        | SdlValue::Rgba(_)
        | SdlValue::Vector3(_)
        | SdlValue::Point3(_)
        | SdlValue::Quaternion(_) => parse_composite(value, text)?,
        other => return Err(EditError::UnhandledType(other.var_type().code())),
    }
    Ok(())
}

fn parse_composite(value: &mut SdlValue, text: &str) -> Result<(), EditError> {
    // Well-formedness first, then the value's own interpretation
    let tag = PrcParser::parse(text)?;
    match value {
        SdlValue::Key(v) => v.prc_parse(&tag)?,
        SdlValue::Creatable(Some(v)) => v.prc_parse(&tag)?,
        SdlValue::Creatable(None) => return Err(EditError::NullCreatable),
        SdlValue::Rgb8(v) | SdlValue::Rgba8(v) => v.prc_parse(&tag)?,
        SdlValue::Rgb(v) | SdlValue::Rgba(v) => v.prc_parse(&tag)?,
        SdlValue::Vector3(v) | SdlValue::Point3(v) => v.prc_parse(&tag)?,
        SdlValue::Quaternion(v) => v.prc_parse(&tag)?,
        other => return Err(EditError::UnhandledType(other.var_type().code())),
    }
    Ok(())
}

trait FloatText: core::str::FromStr + Copy {
    fn is_finite(self) -> bool;
}

impl FloatText for f32 {
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }
}

impl FloatText for f64 {
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }
}

fn parse_float<T: FloatText>(text: &str) -> Result<T, EditError> {
    let trimmed = text.trim();
    let parsed: T = trimmed
        .parse()
        .map_err(|_| EditError::InvalidFloat(text.to_string()))?;

    // Overflow parses to infinity; only accept it when spelled out
    let lower = trimmed.to_ascii_lowercase();
    if !parsed.is_finite() && !lower.contains("inf") && !lower.contains("nan") {
        return Err(EditError::InvalidFloat(text.to_string()));
    }
    Ok(parsed)
}

fn parse_latin1_char(text: &str) -> Result<u8, EditError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => {
            u8::try_from(u32::from(c)).map_err(|_| EditError::InvalidChar(text.to_string()))
        }
        _ => Err(EditError::InvalidChar(text.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditStage;
    use void_sdl::{Color32, GenericType, GenericValue, Location, Matrix44, Quat, Uoid, Vector3};

    #[test]
    fn test_scalar_round_trips() {
        let cases = [
            SdlValue::Int(-42),
            SdlValue::Float(3.5),
            SdlValue::Double(-0.125),
            SdlValue::Bool(true),
            SdlValue::Bool(false),
            SdlValue::Byte(255),
            SdlValue::String("hello world".into()),
            SdlValue::Char(b'x'),
            SdlValue::Char(0xE9),
        ];
        for original in cases {
            let text = render(&original);
            let mut parsed = SdlValue::default_for(original.var_type()).unwrap();
            parse_into(&mut parsed, &text).unwrap();
            assert_eq!(format!("{:?}", parsed), format!("{:?}", original), "text {:?}", text);
        }
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(render(&SdlValue::Bool(true)), "True");
        assert_eq!(render(&SdlValue::Int(-42)), "-42");
        assert_eq!(render(&SdlValue::Float(3.5)), "3.5");
        assert_eq!(render(&SdlValue::Char(0xE9)), "é");
    }

    #[test]
    fn test_validation_rejects_without_mutation() {
        let mut value = SdlValue::Bool(true);
        let err = parse_into(&mut value, "Maybe").unwrap_err();
        assert_eq!(err.stage(), EditStage::Validation);
        assert_eq!(value.as_bool(), Some(true));
        assert!(parse_into(&mut value, "true").is_err());

        let mut value = SdlValue::Byte(7);
        assert!(matches!(parse_into(&mut value, "300"), Err(EditError::ByteOutOfRange(_))));
        assert!(matches!(parse_into(&mut value, "-1"), Err(EditError::ByteOutOfRange(_))));
        assert!(matches!(parse_into(&mut value, "x"), Err(EditError::InvalidInteger(_))));
        assert_eq!(value.as_byte(), Some(7));

        let mut value = SdlValue::Char(b'a');
        assert!(matches!(parse_into(&mut value, "ab"), Err(EditError::InvalidChar(_))));
        assert!(matches!(parse_into(&mut value, ""), Err(EditError::InvalidChar(_))));
        assert!(matches!(parse_into(&mut value, "€"), Err(EditError::InvalidChar(_))));
        assert_eq!(value.as_char(), Some(b'a'));

        let mut value = SdlValue::Int(1);
        assert!(matches!(parse_into(&mut value, "abc"), Err(EditError::InvalidInteger(_))));
        assert!(matches!(parse_into(&mut value, "1.5"), Err(EditError::InvalidInteger(_))));
        assert_eq!(value.as_int(), Some(1));

        let mut value = SdlValue::Float(2.0);
        assert!(matches!(parse_into(&mut value, "1e40"), Err(EditError::InvalidFloat(_))));
        assert!(matches!(parse_into(&mut value, "two"), Err(EditError::InvalidFloat(_))));
        assert_eq!(value.as_float(), Some(2.0));
    }

    #[test]
    fn test_composite_render_has_no_preamble() {
        let text = render(&SdlValue::Vector3(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(text, "<hsVector3 X=\"1\" Y=\"2\" Z=\"3\" />");
        assert!(!text.contains('\n'));

        let nested = render(&SdlValue::Creatable(Some(Box::new(GenericValue::new(GenericType::Int(4))))));
        assert!(nested.starts_with("<plCreatableGenericValue>"));
        assert!(nested.ends_with("</plCreatableGenericValue>"));

        assert_eq!(render(&SdlValue::Creatable(None)), "<plNull />");
    }

    #[test]
    fn test_composite_edit() {
        let mut value = SdlValue::Point3(Vector3::default());
        parse_into(&mut value, "<hsVector3 X=\"1\" Y=\"-2\" Z=\"0.5\" />").unwrap();
        assert_eq!(value.as_vector(), Some(&Vector3::new(1.0, -2.0, 0.5)));
        assert_eq!(value.var_type(), VarType::Point3);

        let key = Uoid::new(Location::new(3, 1), 0x00A2, "Lamp", 9);
        let mut value = SdlValue::Key(Uoid::default());
        parse_into(&mut value, &render(&SdlValue::Key(key.clone()))).unwrap();
        assert_eq!(value.as_key(), Some(&key));

        let mut value = SdlValue::Creatable(Some(Box::new(GenericValue::default())));
        let text = render(&SdlValue::Creatable(Some(Box::new(GenericValue::new(GenericType::String(
            "on".into(),
        ))))));
        parse_into(&mut value, &text).unwrap();
        assert_eq!(render(&value), text);
    }

    #[test]
    fn test_composite_two_stage_failures() {
        let original = Quat::new(0.0, 0.0, 1.0, 0.0);

        let mut value = SdlValue::Quaternion(original);
        let malformed = parse_into(&mut value, "<hsQuat X=\"1\"").unwrap_err();
        assert_eq!(malformed.stage(), EditStage::Markup);
        assert!(matches!(malformed, EditError::Markup(_)));

        let wrong_tag = parse_into(&mut value, "<hsVector3 X=\"1\" Y=\"2\" Z=\"3\" />").unwrap_err();
        assert_eq!(wrong_tag.stage(), EditStage::Semantic);
        assert!(matches!(wrong_tag, EditError::Tag(_)));

        let missing = parse_into(&mut value, "<hsQuat X=\"1\" Y=\"2\" />").unwrap_err();
        assert_eq!(missing.stage(), EditStage::Semantic);

        assert!(matches!(value, SdlValue::Quaternion(q) if q == original));
    }

    #[test]
    fn test_null_creatable_edit() {
        let mut value = SdlValue::Creatable(None);
        assert_eq!(
            parse_into(&mut value, "<plNull").unwrap_err().stage(),
            EditStage::Markup
        );
        assert!(matches!(
            parse_into(&mut value, "<plNull />"),
            Err(EditError::NullCreatable)
        ));
    }

    #[test]
    fn test_color_edit() {
        let mut value = SdlValue::Rgba8(Color32::default());
        parse_into(&mut value, "<hsColor32 red=\"1\" green=\"2\" blue=\"3\" alpha=\"4\" />").unwrap();
        assert!(matches!(value, SdlValue::Rgba8(c) if c == Color32::new(1, 2, 3, 4)));

        let mut value = SdlValue::Rgba8(Color32::default());
        let err = parse_into(&mut value, "<hsColor32 red=\"256\" green=\"2\" blue=\"3\" alpha=\"4\" />")
            .unwrap_err();
        assert_eq!(err.stage(), EditStage::Semantic);
    }

    #[test]
    fn test_unhandled_types() {
        let mut value = SdlValue::Matrix44(Matrix44::IDENTITY);
        assert_eq!(render(&value), "Unhandled SDL Var Type (59)");
        assert!(matches!(parse_into(&mut value, "1"), Err(EditError::UnhandledType(59))));

        assert!(render(&SdlValue::Short(3)).contains("10"));
        for ty in VarType::ALL {
            let Some(value) = SdlValue::default_for(ty) else {
                continue;
            };
            assert_eq!(render(&value).starts_with("Unhandled"), !is_text_mapped(ty), "{}", ty);
        }
    }
}
