//! # Manifest Patcher
//!
//! Points the `<application>` element of a decompiled `AndroidManifest.xml`
//! at the network security config document.
//!
//! This is a plain text edit. Attribute order, namespace prefixes and
//! formatting stay exactly as apktool wrote them.

use super::layout::NETWORK_SECURITY_CONFIG_RES;
use crate::core::error::{Error, Result};
use std::fs;
use std::path::Path;

const ATTRIBUTE: &str = "android:networkSecurityConfig";
const APPLICATION_TAG: &str = "<application";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    /// Existing attribute values were pointed at our resource, this many times.
    Rewrote(usize),
    /// The attribute was added to the first `<application>` tag.
    Inserted,
}

/// Patch the manifest at `path` in place.
///
/// Nothing is written if the manifest has nowhere to put the attribute.
pub fn patch(path: &Path) -> Result<Edit> {
    log::info!("Modifying {}...", path.display());

    let manifest = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let (patched, edit) = patch_text(&manifest).map_err(|reason| Error::Structure {
        path: path.to_path_buf(),
        reason,
    })?;
    fs::write(path, patched).map_err(|e| Error::io(path, e))?;

    match edit {
        Edit::Rewrote(n) => log::info!("✅ Rewrote {n} existing {ATTRIBUTE} value(s)"),
        Edit::Inserted => log::info!("✅ Inserted {ATTRIBUTE} into <application>"),
    }
    Ok(edit)
}

/// Rules, first match wins:
///
/// 1. the attribute already carries a value: every quoted value of it is
///    replaced by [`NETWORK_SECURITY_CONFIG_RES`];
/// 2. there is an `<application` tag: the attribute is inserted right after
///    the tag name of the first one;
/// 3. otherwise the manifest is rejected.
///
/// A bare mention of the attribute name, e.g. inside `tools:replace`, has no
/// value to rewrite and falls through to rule 2.
pub fn patch_text(manifest: &str) -> std::result::Result<(String, Edit), &'static str> {
    if manifest.contains(ATTRIBUTE) {
        if let (patched, n @ 1..) = rewrite_values(manifest) {
            return Ok((patched, Edit::Rewrote(n)));
        }
    }

    let at = find_application_tag(manifest)
        .ok_or("no <application> element found")?
        + APPLICATION_TAG.len();
    let mut patched = String::with_capacity(manifest.len() + 64);
    patched.push_str(&manifest[..at]);
    patched.push_str(&format!(" {ATTRIBUTE}=\"{NETWORK_SECURITY_CONFIG_RES}\" "));
    patched.push_str(&manifest[at..]);
    Ok((patched, Edit::Inserted))
}

fn rewrite_values(manifest: &str) -> (String, usize) {
    let mut patched = String::with_capacity(manifest.len() + 32);
    let mut rest = manifest;
    let mut count = 0;

    while let Some(pos) = rest.find(ATTRIBUTE) {
        let (head, tail) = rest.split_at(pos + ATTRIBUTE.len());
        patched.push_str(head);
        rest = tail;

        let Some((start, quote)) = value_start(rest) else {
            continue;
        };
        let Some(len) = rest[start..].find(quote) else {
            continue;
        };
        patched.push_str(&rest[..start]);
        patched.push_str(NETWORK_SECURITY_CONFIG_RES);
        // Resume at the closing quote.
        rest = &rest[start + len..];
        count += 1;
    }

    patched.push_str(rest);
    (patched, count)
}

// Offset just past the opening quote of `= "value"`, and the quote used.
fn value_start(s: &str) -> Option<(usize, char)> {
    let value = s.trim_start().strip_prefix('=')?.trim_start();
    let quote = value.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    Some((s.len() - value.len() + quote.len_utf8(), quote))
}

fn find_application_tag(manifest: &str) -> Option<usize> {
    manifest.match_indices(APPLICATION_TAG).map(|(i, _)| i).find(|&i| {
        manifest[i + APPLICATION_TAG.len()..]
            .chars()
            .next()
            .is_some_and(|c| c.is_whitespace() || c == '>' || c == '/')
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const REF_ATTR: &str = r#"android:networkSecurityConfig="@xml/network_security_config""#;

    #[test]
    fn inserts_into_minimal_manifest() {
        let (patched, edit) = patch_text("<manifest><application/></manifest>").unwrap();
        assert_eq!(
            patched,
            r#"<manifest><application android:networkSecurityConfig="@xml/network_security_config" /></manifest>"#
        );
        assert_eq!(edit, Edit::Inserted);
    }

    #[test]
    fn inserts_only_into_first_application_tag() {
        let manifest = r#"<manifest>
    <application android:label="a">
    </application>
    <!-- <application android:label="b"> -->
</manifest>"#;
        let (patched, _) = patch_text(manifest).unwrap();
        assert_eq!(patched.matches(REF_ATTR).count(), 1);
        assert!(patched.contains(&format!("<application {REF_ATTR}  android:label=\"a\">")));
        assert!(patched.contains("<!-- <application android:label=\"b\"> -->"));
        assert!(patched.contains("</application>"));
    }

    #[test]
    fn skips_tags_that_only_start_with_application() {
        let manifest = "<manifest><applicationInfo/><application android:label=\"a\"/></manifest>";
        let (patched, _) = patch_text(manifest).unwrap();
        assert!(patched.starts_with("<manifest><applicationInfo/><application android:network"));
    }

    #[test]
    fn replaces_existing_values() {
        let manifest = r#"<application android:networkSecurityConfig="@xml/pinning" android:label="x"/>"#;
        let (patched, edit) = patch_text(manifest).unwrap();
        assert_eq!(
            patched,
            format!(r#"<application {REF_ATTR} android:label="x"/>"#)
        );
        assert_eq!(edit, Edit::Rewrote(1));
    }

    #[test]
    fn replaces_every_occurrence_and_tolerates_spacing() {
        let manifest = "<a android:networkSecurityConfig = 'one'/>\n<b android:networkSecurityConfig=\"\"/>";
        let (patched, edit) = patch_text(manifest).unwrap();
        assert_eq!(
            patched,
            "<a android:networkSecurityConfig = '@xml/network_security_config'/>\n\
             <b android:networkSecurityConfig=\"@xml/network_security_config\"/>"
        );
        assert_eq!(edit, Edit::Rewrote(2));
    }

    #[test]
    fn rewriting_is_idempotent() {
        let manifest = "<manifest><application android:debuggable=\"true\"></application></manifest>";
        let (once, _) = patch_text(manifest).unwrap();
        let (twice, edit) = patch_text(&once).unwrap();
        assert_eq!(once, twice);
        assert_eq!(edit, Edit::Rewrote(1));
    }

    #[test]
    fn attribute_name_without_value_still_gets_inserted() {
        let manifest = r#"<manifest><application tools:replace="android:networkSecurityConfig" android:label="x"></application></manifest>"#;
        let (patched, edit) = patch_text(manifest).unwrap();
        assert_eq!(edit, Edit::Inserted);
        assert_eq!(
            patched,
            format!(
                r#"<manifest><application {REF_ATTR}  tools:replace="android:networkSecurityConfig" android:label="x"></application></manifest>"#
            )
        );

        let (again, edit) = patch_text(&patched).unwrap();
        assert_eq!(edit, Edit::Rewrote(1));
        assert_eq!(again, patched);
    }

    #[test]
    fn attribute_name_without_application_is_rejected() {
        assert!(patch_text("<manifest tools:remove=\"android:networkSecurityConfig\"/>").is_err());
    }

    #[test]
    fn manifest_without_application_fails_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("AndroidManifest.xml");
        let original = "<manifest package=\"com.example\"></manifest>";
        fs::write(&path, original).unwrap();

        let err = patch(&path).unwrap_err();
        assert!(matches!(err, Error::Structure { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn patches_file_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("AndroidManifest.xml");
        fs::write(&path, "<manifest><application/></manifest>").unwrap();

        assert_eq!(patch(&path).unwrap(), Edit::Inserted);
        assert!(fs::read_to_string(&path).unwrap().contains(REF_ATTR));
    }

    #[test]
    fn missing_manifest_is_an_io_error() {
        let dir = tempdir().unwrap();
        let err = patch(&dir.path().join("AndroidManifest.xml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
