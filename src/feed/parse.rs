// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::episode::episode_filename;
use crate::error::ParseError;

/// A downloadable episode extracted from a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    /// On-disk filename derived from the episode title, always `.mp3`
    pub filename: String,
    /// Enclosure URL the episode is downloaded from
    pub source_url: String,
}

/// Parse feed XML into a list of downloadable items, in document order.
///
/// Every `item` element is scanned wherever it sits in the document, but
/// only its direct child elements count. A `title` child sets the pending
/// filename and an `enclosure` child sets the pending URL; as soon as
/// both are set, one item is emitted and both accumulators reset, so a
/// block holding several title/enclosure pairs yields several items and
/// either child order works. An `item` that ends with only one half
/// contributes nothing.
pub fn parse_feed(xml: &[u8]) -> Result<Vec<FeedItem>, ParseError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut buf = Vec::new();

    // Number of open elements inside the current <item>; 0 = outside
    let mut item_depth = 0usize;
    let mut pending_filename = String::new();
    let mut pending_url = String::new();
    // Set while inside a direct <title> child of the current item
    let mut title_text: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                if item_depth == 0 {
                    if e.name().as_ref() == b"item" {
                        item_depth = 1;
                        pending_filename.clear();
                        pending_url.clear();
                    }
                } else {
                    item_depth += 1;
                    if item_depth == 2 {
                        match e.name().as_ref() {
                            b"title" => title_text = Some(String::new()),
                            b"enclosure" => pending_url = enclosure_url(&e),
                            _ => {}
                        }
                    }
                }
            }

            Event::Empty(e) => {
                // Self-closing direct child, e.g. <enclosure url="..."/>
                if item_depth == 1 {
                    match e.name().as_ref() {
                        b"enclosure" => pending_url = enclosure_url(&e),
                        b"title" => pending_filename = episode_filename(""),
                        _ => {}
                    }
                    emit_if_complete(&mut pending_filename, &mut pending_url, &mut items);
                }
            }

            Event::Text(e) => {
                if let Some(text) = title_text.as_mut() {
                    text.push_str(&e.unescape().unwrap_or_default());
                }
            }

            Event::CData(e) => {
                if let Some(text) = title_text.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }

            Event::End(_) => {
                if item_depth > 1 {
                    item_depth -= 1;
                    if item_depth == 1 {
                        // A direct child of the item just closed
                        if let Some(text) = title_text.take() {
                            pending_filename = episode_filename(&text);
                        }
                        emit_if_complete(&mut pending_filename, &mut pending_url, &mut items);
                    }
                } else if item_depth == 1 {
                    // Leaving the item; an incomplete pair is discarded
                    item_depth = 0;
                }
            }

            Event::Eof => break,

            _ => {}
        }
        buf.clear();
    }

    Ok(items)
}

/// Read the `url` attribute of an enclosure element, empty when absent
fn enclosure_url(e: &BytesStart) -> String {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"url")
        .and_then(|attr| attr.unescape_value().ok())
        .map(|value| value.into_owned())
        .unwrap_or_default()
}

fn emit_if_complete(filename: &mut String, url: &mut String, items: &mut Vec<FeedItem>) {
    if !filename.is_empty() && !url.is_empty() {
        items.push(FeedItem {
            filename: std::mem::take(filename),
            source_url: std::mem::take(url),
        });
    }
}
