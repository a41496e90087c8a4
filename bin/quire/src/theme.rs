//! The built-in `plain` theme.
//!
//! Semantic HTML with no scripts. Every page shares one layout: a header
//! linking to the index, sections and pages, the page's own content, and a
//! footer with the site name.

use std::sync::Arc;

use quire_core::{
    Config, Content, ContentPath, FileModeProvider, Item, Location, Tag, TagDetailsPage,
};
use quire_generator::{Element, Html, Node, PublishingContext, RenderResult, Theme};

/// Site-wide values every page needs.
#[derive(Debug, Clone)]
struct SiteMeta {
    name: String,
    description: Option<String>,
    language: String,
    stylesheets: Vec<String>,
    /// Same modes the publisher applies, so links match the files written.
    file_modes: FileModeProvider,
}

/// Build the `plain` theme for a configured site.
pub fn plain(config: &Config) -> Theme {
    let meta = Arc::new(SiteMeta {
        name: config.site.name.clone(),
        description: config.site.description.clone(),
        language: config.site.language.clone(),
        stylesheets: config
            .build
            .resources
            .iter()
            .filter(|p| p.extension().is_some_and(|ext| ext == "css"))
            .map(|p| format!("/{}", p.to_string_lossy().replace('\\', "/")))
            .collect(),
        file_modes: config.build.file_modes.provider(),
    });

    let index_meta = meta.clone();
    let section_meta = meta.clone();
    let item_meta = meta.clone();
    let page_meta = meta.clone();
    let list_meta = meta.clone();
    let details_meta = meta;

    Theme::new(
        "plain",
        move |index, ctx| {
            let recent = ctx
                .sections()
                .iter()
                .flat_map(|s| s.items())
                .map(|item| Node::from(item_link(&index_meta, item)));
            let main = content_body(&index.content)
                .child(Element::new("ul").attr("class", "recent").children(recent));
            layout(&index_meta, ctx, &index.content, main)
        },
        move |section, ctx| {
            let items = section
                .items()
                .iter()
                .map(|item| Node::from(item_link(&section_meta, item)));
            let main = content_body(&section.content)
                .child(Element::new("ul").attr("class", "items").children(items));
            layout(&section_meta, ctx, &section.content, main)
        },
        move |item, ctx| {
            let mut main = Element::new("article");
            if let Some(date) = item.content.date {
                main = main.child(
                    Element::new("time")
                        .attr("datetime", date.to_rfc3339())
                        .text(date.format("%Y-%m-%d").to_string()),
                );
            }
            main = main.child(content_body(&item.content));
            if !item.tags.is_empty() {
                let tags = item.tags.iter().map(|tag| {
                    Node::from(Element::new("li").child(
                        Element::new("a")
                            .attr("href", tag_href(&item_meta, ctx, tag))
                            .text(tag.name()),
                    ))
                });
                main = main.child(Element::new("ul").attr("class", "tags").children(tags));
            }
            layout(&item_meta, ctx, &item.content, main)
        },
        move |page, ctx| layout(&page_meta, ctx, &page.content, content_body(&page.content)),
    )
    .with_tag_list(move |list, ctx| {
        let tags = list.tags.iter().map(|tag| {
            let count = ctx.items_tagged(tag).len();
            Node::from(Element::new("li").child(
                Element::new("a")
                    .attr("href", tag_href(&list_meta, ctx, tag))
                    .text(format!("{tag} ({count})")),
            ))
        });
        let content = titled_or(&list.content, "Tags");
        let main = content_body(&content).child(Element::new("ul").attr("class", "tags").children(tags));
        layout(&list_meta, ctx, &content, main).map(Some)
    })
    .with_tag_details(move |details, ctx| {
        let tagged = ctx.items_tagged(&details.tag);
        if tagged.is_empty() {
            return Ok(None);
        }
        let items = tagged
            .into_iter()
            .map(|item| Node::from(item_link(&details_meta, item)));
        let content = titled_or(&details.content, &format!("Tagged with {}", details.tag));
        let main = content_body(&content).child(Element::new("ul").attr("class", "items").children(items));
        layout(&details_meta, ctx, &content, main).map(Some)
    })
}

fn titled_or(content: &Content, fallback: &str) -> Content {
    if content.title.is_empty() {
        Content {
            title: fallback.to_string(),
            ..content.clone()
        }
    } else {
        content.clone()
    }
}

/// Absolute link to a content path's folder. Index and sections always live there.
fn href(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{path}/")
    }
}

/// Absolute link to the file a location is written to, dropping a trailing `index.html`.
fn file_href(meta: &SiteMeta, location: &dyn Location) -> String {
    let file = meta.file_modes.mode_for(location).resolve(location);
    link_to_file(&file)
}

fn link_to_file(file: &ContentPath) -> String {
    match file.as_str().strip_suffix("index.html") {
        Some(folder) if folder.is_empty() || folder.ends_with('/') => format!("/{folder}"),
        _ => format!("/{file}"),
    }
}

fn tag_href(meta: &SiteMeta, ctx: &PublishingContext<'_>, tag: &Tag) -> String {
    let details = TagDetailsPage::new(tag.clone(), ctx.path_for_tag(tag), Content::default());
    file_href(meta, &details)
}

fn item_link(meta: &SiteMeta, item: &Item) -> Element {
    Element::new("li").child(
        Element::new("a")
            .attr("href", file_href(meta, item))
            .text(item.content.title.as_str()),
    )
}

fn content_body(content: &Content) -> Element {
    let mut body = Element::new("section").child(Element::new("h1").text(content.title.as_str()));
    if let Some(description) = &content.description {
        body = body.child(Element::new("p").attr("class", "description").text(description.as_str()));
    }
    if !content.body.is_empty() {
        body = body.child(Element::new("div").attr("class", "body").raw(content.body.as_str()));
    }
    body
}

fn navigation(meta: &SiteMeta, ctx: &PublishingContext<'_>) -> Element {
    let home = Element::new("a")
        .attr("href", href(ctx.index().path().as_str()))
        .text("Home");
    let sections = ctx.sections().iter().map(|section| {
        Node::from(
            Element::new("a")
                .attr("href", href(section.path().as_str()))
                .text(section.content.title.as_str()),
        )
    });
    let pages = ctx.pages().values().map(|page| {
        Node::from(
            Element::new("a")
                .attr("href", file_href(meta, page))
                .text(page.content.title.as_str()),
        )
    });
    Element::new("nav")
        .child(home)
        .children(sections)
        .children(pages)
}

fn layout(meta: &SiteMeta, ctx: &PublishingContext<'_>, content: &Content, main: Element) -> RenderResult {
    let title = if content.title.is_empty() {
        meta.name.clone()
    } else {
        format!("{} | {}", content.title, meta.name)
    };

    let mut head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8"))
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1"),
        )
        .child(Element::new("title").text(title));
    if let Some(description) = content.description.as_ref().or(meta.description.as_ref()) {
        head = head.child(
            Element::new("meta")
                .attr("name", "description")
                .attr("content", description.as_str()),
        );
    }
    for stylesheet in &meta.stylesheets {
        head = head.child(
            Element::new("link")
                .attr("rel", "stylesheet")
                .attr("href", stylesheet.as_str()),
        );
    }

    let body = Element::new("body")
        .child(Element::new("header").child(navigation(meta, ctx)))
        .child(Element::new("main").child(main))
        .child(Element::new("footer").child(Element::new("p").text(meta.name.as_str())));

    Ok(Box::new(Html::new(
        Element::new("html")
            .attr("lang", meta.language.as_str())
            .child(head)
            .child(body),
    )))
}
