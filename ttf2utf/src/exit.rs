// ttf2utf/src/exit.rs
//! Process exit codes and user-facing messages for failed runs.

use ttf2utf_core::Ttf2UtfError;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_MAP_FILE_NOT_FOUND: i32 = 3;
pub const EXIT_INVALID_MAP_DEFINITION: i32 = 4;
pub const EXIT_NO_MAP_FOR_ORIGIN: i32 = 5;
pub const EXIT_UNSUPPORTED_TARGET: i32 = 6;
pub const EXIT_AUTO_DETECT_UNSUPPORTED: i32 = 7;
pub const EXIT_BAD_DOCUMENT: i32 = 8;

/// The core error behind `err`, if there is one.
pub fn core_error(err: &anyhow::Error) -> Option<&Ttf2UtfError> {
    err.chain().find_map(|cause| cause.downcast_ref::<Ttf2UtfError>())
}

pub fn exit_code(err: &anyhow::Error) -> i32 {
    match core_error(err) {
        Some(Ttf2UtfError::MapFileNotFound { .. }) => EXIT_MAP_FILE_NOT_FOUND,
        Some(Ttf2UtfError::InvalidMapDefinition(_)) => EXIT_INVALID_MAP_DEFINITION,
        Some(Ttf2UtfError::NoMapForOrigin(_)) => EXIT_NO_MAP_FOR_ORIGIN,
        Some(Ttf2UtfError::UnsupportedTarget(_)) => EXIT_UNSUPPORTED_TARGET,
        Some(Ttf2UtfError::AutoDetectUnsupported(_)) => EXIT_AUTO_DETECT_UNSUPPORTED,
        Some(Ttf2UtfError::BadDocument { .. }) => EXIT_BAD_DOCUMENT,
        _ => EXIT_FAILURE,
    }
}

/// The message printed for a failed run: the core error's own text plus a hint
/// for the kinds a user can fix from the command line.
pub fn describe(err: &anyhow::Error) -> String {
    let Some(core) = core_error(err) else {
        return format!("{:#}", err);
    };
    let hint = match core {
        Ttf2UtfError::MapFileNotFound { .. } => Some("Check the --map-file path or TTF2UTF_MAP_FILE."),
        Ttf2UtfError::InvalidMapDefinition(_) => Some("Fix the mapping definition and try again."),
        Ttf2UtfError::NoMapForOrigin(_) => Some("Run `ttf2utf fonts` to list the supported input fonts."),
        Ttf2UtfError::UnsupportedTarget(_) => Some("Run `ttf2utf fonts` to list the supported output fonts."),
        Ttf2UtfError::AutoDetectUnsupported(_) => Some("Pass the font explicitly with --input-font."),
        Ttf2UtfError::BadDocument { .. } => Some("The input must be a valid .docx document."),
        _ => None,
    };
    match hint {
        Some(hint) => format!("{}. {}", core, hint),
        None => format!("{:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn wrapped(err: Ttf2UtfError) -> anyhow::Error {
        Err::<(), _>(err).context("while converting").unwrap_err()
    }

    #[test]
    fn codes_survive_context() {
        assert_eq!(exit_code(&wrapped(Ttf2UtfError::NoMapForOrigin("Helvetica".into()))), 5);
        assert_eq!(exit_code(&wrapped(Ttf2UtfError::UnsupportedTarget("Kantipur".into()))), 6);
        assert_eq!(exit_code(&wrapped(Ttf2UtfError::AutoDetectUnsupported("plain text files".into()))), 7);
        assert_eq!(exit_code(&anyhow::anyhow!("something else")), EXIT_FAILURE);
    }

    #[test]
    fn message_names_the_font_and_a_hint() {
        let message = describe(&wrapped(Ttf2UtfError::NoMapForOrigin("Helvetica".into())));
        assert!(message.contains("'Helvetica'"));
        assert!(message.contains("ttf2utf fonts"));
    }
}
