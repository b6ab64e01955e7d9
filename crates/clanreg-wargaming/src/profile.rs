//! Language labels from a clan's public profile page.

use scraper::{ElementRef, Html, Selector};

use crate::{Error, Result};

const LANGUAGE_LIST: &str = ".language-list";

/// Collect the text of every element below the first `.language-list` in
/// `html`.
///
/// Text is trimmed and inner whitespace collapsed; empty labels are dropped
/// and duplicates keep their first position. Returns `Ok(None)` when the page
/// has no language list.
pub fn extract_languages(html: &str) -> Result<Option<Vec<String>>> {
  let document = Html::parse_document(html);
  let selector = Selector::parse(LANGUAGE_LIST)
    .map_err(|e| Error::Selector(format!("{LANGUAGE_LIST}: {e:?}")))?;

  let Some(list) = document.select(&selector).next() else {
    return Ok(None);
  };

  let mut languages: Vec<String> = Vec::new();
  for element in list.descendants().skip(1).filter_map(ElementRef::wrap) {
    let text = element.text().collect::<String>();
    let label = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if !label.is_empty() && !languages.contains(&label) {
      languages.push(label);
    }
  }
  Ok(Some(languages))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels_are_trimmed_and_deduplicated() {
    let html = r#"
      <html><body>
        <div class="clan-info">
          <ul class="language-list">
            <li class="language">  Français </li>
            <li class="language">English</li>
            <li class="language">Français</li>
            <li class="language">   </li>
          </ul>
        </div>
      </body></html>"#;
    assert_eq!(extract_languages(html).unwrap().unwrap(), vec!["Français", "English"]);
  }

  #[test]
  fn nested_text_is_seen_once() {
    let html = r#"<div class="language-list"><span><b>Deutsch</b></span></div>"#;
    assert_eq!(extract_languages(html).unwrap().unwrap(), vec!["Deutsch"]);
  }

  #[test]
  fn empty_list_yields_no_labels() {
    let html = r#"<div class="language-list"></div>"#;
    assert_eq!(extract_languages(html).unwrap(), Some(vec![]));
  }

  #[test]
  fn page_without_list_is_none() {
    let html = "<html><body><p>Clan not found</p></body></html>";
    assert_eq!(extract_languages(html).unwrap(), None);
  }
}
