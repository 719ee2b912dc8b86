use super::Snapshot;
use crate::dom::{ContainerId, Content, Document, StatId, TriggerRole};
use crate::records::render::{Certificate, LeaderRow};

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A JavaScript string literal, for inline event handlers.
fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn hidden_attr(hidden: bool) -> &'static str {
    if hidden {
        " hidden"
    } else {
        ""
    }
}

fn medal_svg(row: &LeaderRow) -> String {
    let Some(medal) = row.medal else {
        return String::new();
    };
    format!(
        r#"<svg class="medal" viewBox="0 0 24 24" aria-hidden="true"><path d="M7.2 2.5h4.4l-2.2 6.1L7.2 2.5Z" fill="rgba(99, 102, 241, 0.85)"/><path d="M12.4 2.5h4.4l-2.2 6.1L12.4 2.5Z" fill="rgba(14, 165, 233, 0.75)"/><circle cx="12" cy="13" r="6.5" fill="{}" stroke="{}" stroke-width="1"/></svg>"#,
        medal.fill(),
        medal.stroke()
    )
}

fn render_certificate(card: &Certificate) -> String {
    let footage = match card.footage.as_deref() {
        Some(href) => format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            escape_html(href),
            card.footage_label()
        ),
        None => card.footage_label().to_string(),
    };
    format!(
        r#"<article class="certificate"><div class="certInner">
  <div class="certTop"><div class="seal">{seal}</div><span class="badge badge--{status}">{badge}</span></div>
  <div class="personRow"><img class="thumb" loading="lazy" decoding="async" alt="{alt}" src="{src}" onerror="this.onerror=null;this.src={placeholder}"/><div><p class="person">{person}</p><p class="title">{title}</p></div></div>
  <p class="desc">{desc}</p>
  <div class="certBottom"><div class="meta">{meta}</div><div class="footage">{footage}</div></div>
</div></article>
"#,
        seal = escape_html(&card.seal),
        status = card.status,
        badge = escape_html(&card.badge),
        alt = escape_html(&card.image_alt),
        src = escape_html(&card.image_src),
        placeholder = escape_html(&js_string(&card.placeholder_src)),
        person = escape_html(&card.person),
        title = escape_html(&card.title),
        desc = escape_html(&card.description),
        meta = escape_html(&card.meta),
        footage = footage,
    )
}

fn render_leader_row(row: &LeaderRow) -> String {
    format!(
        r#"<li class="leaderItem"><div class="leaderLeft"><span class="rankPill">{rank}</span>{medal}<span class="leaderName">{name}</span></div><a class="arrowBtn" aria-label="{label}" href="?person={query}">&rarr;</a></li>
"#,
        rank = escape_html(&row.rank_label),
        medal = medal_svg(row),
        name = escape_html(&row.name),
        label = escape_html(&row.action_label),
        query = escape_html(&encode_query_value(&row.name)),
    )
}

fn encode_query_value(value: &str) -> String {
    let mut out = String::new();
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

fn render_content(content: &Content, list: bool) -> String {
    let message = |class: &str, text: &str| {
        let tag = if list { "li" } else { "div" };
        format!(r#"<{tag} class="{class}">{}</{tag}>"#, escape_html(text))
    };
    match content {
        Content::Blank => String::new(),
        Content::Empty(m) => message("empty", m),
        Content::Error(m) => message("error", m),
        Content::Text(m) => escape_html(m),
        Content::Certificates(cards) => cards.iter().map(render_certificate).collect(),
        Content::Leaderboard(rows) => rows.iter().map(render_leader_row).collect(),
    }
}

fn container_body(doc: &Document, id: ContainerId, list: bool) -> String {
    doc.content(id)
        .map(|c| render_content(c, list))
        .unwrap_or_default()
}

fn container_hidden(doc: &Document, id: ContainerId) -> &'static str {
    hidden_attr(doc.is_hidden(id).unwrap_or(false))
}

fn render_nav(doc: &Document) -> String {
    let mut out = String::new();
    for trigger in doc.nav_triggers.iter() {
        let target = trigger.target.as_deref().unwrap_or_default();
        let class = if trigger.active { "navBtn is-active" } else { "navBtn" };
        let mut attrs = format!(r#" class="{class}" data-nav="{}""#, escape_html(target));
        if trigger.role == Some(TriggerRole::Tab) {
            attrs.push_str(r#" role="tab""#);
        }
        if let Some(selected) = trigger.aria_selected {
            attrs.push_str(&format!(r#" aria-selected="{selected}""#));
        }
        if let Some(tab_index) = trigger.tab_index {
            attrs.push_str(&format!(r#" tabindex="{tab_index}""#));
        }
        out.push_str(&format!(
            r##"    <a{attrs} href="#{href}">{label}</a>
"##,
            href = escape_html(target),
            label = escape_html(target),
        ));
    }
    out
}

fn render_stats(doc: &Document) -> String {
    StatId::ALL
        .iter()
        .filter_map(|id| {
            doc.stat(*id).map(|value| {
                format!(
                    r#"<div class="stat"><span id="{}">{}</span></div>"#,
                    id.element_id(),
                    escape_html(value)
                )
            })
        })
        .collect()
}

/// The people panel lives in the `people` section when the page has one,
/// otherwise after the sections.
fn render_people(doc: &Document) -> String {
    if !ContainerId::ALL.iter().all(|id| doc.has_container(*id)) {
        return String::new();
    }
    format!(
        r#"<div id="peopleLeaderboard"{lb_hidden}><ol id="leaderboardList">{list}</ol></div>
<div id="peopleProfile"{profile_hidden}><a id="profileBackBtn" href="?">Back</a><h3 id="profileName">{name}</h3><div id="profileGrid" class="grid">{profile}</div></div>
"#,
        lb_hidden = container_hidden(doc, ContainerId::PeopleLeaderboard),
        list = container_body(doc, ContainerId::LeaderboardList, true),
        profile_hidden = container_hidden(doc, ContainerId::PeopleProfile),
        name = container_body(doc, ContainerId::ProfileName, false),
        profile = container_body(doc, ContainerId::ProfileGrid, false),
    )
}

fn render_grids(doc: &Document) -> String {
    let mut out = String::new();
    for id in [ContainerId::RecordsGrid, ContainerId::FormerGrid] {
        if doc.has_container(id) {
            out.push_str(&format!(
                r#"<div id="{}" class="grid">{}</div>
"#,
                id.element_id(),
                container_body(doc, id, false)
            ));
        }
    }
    out
}

pub fn render_html(snapshot: &Snapshot<'_>) -> Vec<u8> {
    let doc = snapshot.document;
    let mut sections = String::new();
    for page in doc.pages.iter() {
        let id = page.id.as_deref().unwrap_or_default();
        let class = if page.active { "page is-active" } else { "page" };
        let body = match id {
            "records" => render_grids(doc),
            "people" => render_people(doc),
            _ => String::new(),
        };
        sections.push_str(&format!(
            r#"  <section id="{}" class="{class}" data-page{}>
{body}  </section>
"#,
            escape_html(id),
            hidden_attr(page.hidden),
        ));
    }
    let has_people_page = doc.pages.iter().any(|p| p.id.as_deref() == Some("people"));
    let has_records_page = doc.pages.iter().any(|p| p.id.as_deref() == Some("records"));
    if !has_records_page {
        sections.push_str(&render_grids(doc));
    }
    if !has_people_page {
        sections.push_str(&render_people(doc));
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Records</title>
</head>
<body>
  <!-- {url} -->
  <nav role="tablist">
{nav}  </nav>
  <div class="stats">{stats}</div>
{sections}</body>
</html>
"#,
        url = escape_html(&snapshot.url).replace("--", "&#45;&#45;"),
        nav = render_nav(doc),
        stats = render_stats(doc),
        sections = sections,
    );
    html.into_bytes()
}
