//! End-to-end tests for Quire generation.
//!
//! These tests publish small sites to disk and in memory and check the exact
//! set of files produced.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use quire_core::{
    Content, FileModeProvider, HtmlFileMode, Index, Item, Location, LocationKind, Page, Section,
    SiteGraph, Tag, TagHtmlConfig,
};
use quire_generator::{
    BuildError, Element, GenerationTask, Html, MemoryFileSystem, OutputFolder, Publisher,
    PublishingContext, RenderError, RenderResult, RenderTarget, Theme,
};
use tempfile::TempDir;
use walkdir::WalkDir;

fn page(title: &str, body: &str) -> RenderResult {
    Ok(Box::new(Html::new(
        Element::new("html")
            .child(Element::new("head").child(Element::new("title").text(title)))
            .child(Element::new("body").raw(body)),
    )))
}

fn theme() -> Theme {
    Theme::new(
        "e2e",
        |index, _| page(&index.content.title, ""),
        |section, ctx| {
            let links: String = ctx
                .site()
                .section(&section.id)
                .map(|s| s.items().iter().map(|i| format!("<li>{}</li>", i.content.title)).collect())
                .unwrap_or_default();
            page(&section.content.title, &format!("<ul>{links}</ul>"))
        },
        |item, _| page(&item.content.title, &item.content.body),
        |p, _| page(&p.content.title, &p.content.body),
    )
    .with_tag_list(|list, _| page("Tags", &format!("{} tags", list.tags.len())).map(Some))
    .with_tag_details(|details, ctx| {
        let count = ctx.items_tagged(&details.tag).len();
        page(details.tag.name(), &format!("{count} items")).map(Some)
    })
}

fn reference_site() -> SiteGraph {
    SiteGraph::builder(Index::new(Content::titled("Home")))
        .section(Section::new("sectionA", Content::titled("Section A")))
        .expect("section A")
        .section(Section::new("sectionB", Content::titled("Section B")))
        .expect("section B")
        .item(Item::new("sectionA", "item1", Content::titled("Item 1").with_body("<p>one</p>")))
        .expect("item 1")
        .page(Page::new("page1", Content::titled("Page 1")))
        .expect("page 1")
        .build()
}

fn stand_alone_items_and_pages() -> FileModeProvider {
    FileModeProvider::by_kind(
        HtmlFileMode::FoldersAndIndexFiles,
        vec![
            (LocationKind::Item, HtmlFileMode::StandAlone),
            (LocationKind::Page, HtmlFileMode::StandAlone),
        ],
    )
}

/// Every file below `root`, relative and sorted.
fn files_under(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .expect("under root")
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}

#[test]
fn test_reference_site_produces_exactly_five_files() {
    let output_dir = TempDir::new().expect("temp dir");

    let stats = Publisher::new(theme(), output_dir.path())
        .with_file_mode_provider(stand_alone_items_and_pages())
        .publish(&reference_site())
        .expect("publish should succeed");

    assert_eq!(
        files_under(output_dir.path()),
        vec![
            "index/index.html",
            "page1.html",
            "sectionA/index.html",
            "sectionA/item1.html",
            "sectionB/index.html",
        ]
    );
    assert_eq!(stats.written, 5);
    assert_eq!(stats.skipped, 0);

    let item = fs::read_to_string(output_dir.path().join("sectionA/item1.html")).expect("item");
    assert!(item.contains("<title>Item 1</title>"));
    assert!(item.contains("<p>one</p>"));
    let section = fs::read_to_string(output_dir.path().join("sectionA/index.html")).expect("section");
    assert!(section.contains("<li>Item 1</li>"));
}

#[test]
fn test_reference_site_in_memory_matches_disk() {
    let fs = Arc::new(MemoryFileSystem::new());

    Publisher::new(theme(), "/public")
        .with_file_mode_provider(stand_alone_items_and_pages())
        .with_file_system(fs.clone())
        .publish(&reference_site())
        .expect("publish should succeed");

    let files: Vec<PathBuf> = fs.files();
    assert_eq!(
        files,
        vec![
            PathBuf::from("/public/index/index.html"),
            PathBuf::from("/public/page1.html"),
            PathBuf::from("/public/sectionA/index.html"),
            PathBuf::from("/public/sectionA/item1.html"),
            PathBuf::from("/public/sectionB/index.html"),
        ]
    );
}

#[test]
fn test_tagged_site_with_resources() {
    let theme_dir = TempDir::new().expect("theme dir");
    fs::create_dir_all(theme_dir.path().join("css")).expect("css dir");
    fs::write(theme_dir.path().join("css/site.css"), "body { margin: 0 }").expect("css");
    fs::write(theme_dir.path().join("robots.txt"), "User-agent: *").expect("robots");

    let site = SiteGraph::builder(Index::new(Content::titled("Home")))
        .section(Section::new("posts", Content::titled("Posts")))
        .expect("section")
        .item(
            Item::new("posts", "first", Content::titled("First"))
                .with_tags([Tag::new("Rust"), Tag::new("Static Sites")]),
        )
        .expect("first")
        .item(Item::new("posts", "second", Content::titled("Second")).with_tags([Tag::new("Rust")]))
        .expect("second")
        .tags(TagHtmlConfig::new("topics").with_details_content(|tag| {
            Some(Content::titled(format!("Posts about {tag}")))
        }))
        .build();

    let output_dir = TempDir::new().expect("output dir");
    let theme = theme().with_resources(
        theme_dir.path(),
        [PathBuf::from("css"), PathBuf::from("robots.txt")],
    );

    let stats = Publisher::new(theme, output_dir.path())
        .with_file_mode_provider(HtmlFileMode::StandAlone)
        .publish(&site)
        .expect("publish should succeed");

    assert_eq!(
        files_under(output_dir.path()),
        vec![
            "css/site.css",
            "index/index.html",
            "posts/first.html",
            "posts/index.html",
            "posts/second.html",
            "robots.txt",
            "topics/index.html",
            "topics/rust.html",
            "topics/static-sites.html",
        ]
    );
    assert_eq!(stats.resources, 2);

    let rust = fs::read_to_string(output_dir.path().join("topics/rust.html")).expect("tag page");
    assert!(rust.contains("2 items"));
}

#[test]
fn test_failed_section_reported_while_siblings_complete() {
    let theme = Theme::new(
        "half-broken",
        |_, _| page("Home", ""),
        |section, _| {
            if section.id == "sectionA" {
                Err(RenderError::message("section template failed"))
            } else {
                page(&section.content.title, "")
            }
        },
        |item, _| page(&item.content.title, ""),
        |p, _| page(&p.content.title, ""),
    );
    let output_dir = TempDir::new().expect("temp dir");

    let err = Publisher::new(theme, output_dir.path())
        .with_file_mode_provider(stand_alone_items_and_pages())
        .with_cancel_on_failure(false)
        .publish(&reference_site())
        .expect_err("publish should fail");

    assert!(err.to_string().contains("sectionA"));
    let BuildError::Generation(generation) = err else {
        panic!("expected a generation error");
    };
    assert_eq!(generation.failures().len(), 1);
    assert_eq!(
        files_under(output_dir.path()),
        vec![
            "index/index.html",
            "page1.html",
            "sectionA/item1.html",
            "sectionB/index.html",
        ]
    );
}

#[test]
fn test_single_task_outside_orchestrator() {
    let fs = Arc::new(MemoryFileSystem::new());
    let output = OutputFolder::new("/out", fs.clone());
    let site = reference_site();
    let context = PublishingContext::new(&site, &output);
    let section = site.section("sectionB").expect("section B");

    let task = GenerationTask::new(
        RenderTarget::Section(section),
        HtmlFileMode::custom(|location| location.path().join("home.html")),
    );
    task.run(&theme(), &context, None).expect("task should succeed");

    assert_eq!(fs.files(), vec![PathBuf::from("/out/sectionB/home.html")]);
}
