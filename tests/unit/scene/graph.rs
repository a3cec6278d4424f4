use std::sync::Arc;

use super::*;
use crate::{
    assets::image::PreparedImage,
    foundation::{core::Placement, error::ThemeError},
    scene::node::{ImageNode, NodeKind},
    sprite::decode::{SpriteArtifact, SpriteLimits},
    theme::item::ShowType,
};

fn canvas() -> Canvas {
    Canvas {
        width: 100,
        height: 50,
    }
}

fn image_node(src: &str) -> Node {
    Node::new(
        NodeKind::Image(ImageNode::new(src)),
        Placement {
            width: 10.0,
            height: 10.0,
            ..Placement::default()
        },
    )
}

fn static_asset(w: u32, h: u32) -> LoadedAsset {
    LoadedAsset::Static(Arc::new(
        PreparedImage::from_premul(w, h, vec![255; (w * h * 4) as usize]).unwrap(),
    ))
}

fn sprite_asset() -> LoadedAsset {
    LoadedAsset::Sprite(Arc::new(SpriteArtifact {
        strip: PreparedImage::from_premul(4, 2, vec![0; 32]).unwrap(),
        frame_width: 2,
        frame_height: 2,
        frame_count: 2,
        delay_ms: 100.0,
    }))
}

#[test]
fn insert_iterate_remove_keeps_order() {
    let mut s = Scene::new(canvas(), None);
    let a = s.insert(image_node("a"), None);
    let b = s.insert(
        image_node("b"),
        Some(ThemeItem::new("cpu", "load", ShowType::Image)),
    );
    let c = s.insert(image_node("c"), None);
    assert_eq!(s.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![a, b, c]);
    assert_eq!(s.bound_ids(), vec![b]);

    s.remove(b).unwrap();
    assert_eq!(s.iter().map(|(id, _)| id).collect::<Vec<_>>(), vec![a, c]);
    assert!(s.get(b).is_none());
    assert!(s.item(b).is_none());
    assert_eq!(s.len(), 2);
}

#[test]
fn later_request_wins_regardless_of_completion_order() {
    let mut s = Scene::new(canvas(), None);
    let id = s.insert(image_node("old.png"), None);
    let first = s
        .begin_load(id, "one.png", LoadKind::Static { adopt_size: true }, None)
        .unwrap();
    let second = s
        .begin_load(id, "two.png", LoadKind::Static { adopt_size: true }, None)
        .unwrap();

    let applied = s.complete_load(LoadResult {
        job: second,
        outcome: Ok(static_asset(3, 4)),
    });
    assert_eq!(applied, LoadOutcome::Applied);
    let stale = s.complete_load(LoadResult {
        job: first,
        outcome: Ok(static_asset(7, 7)),
    });
    assert_eq!(stale, LoadOutcome::Stale);

    let node = s.get(id).unwrap();
    assert_eq!(node.image().unwrap().source, "two.png");
    assert_eq!((node.placement.width, node.placement.height), (3.0, 4.0));
}

#[test]
fn completion_records_raw_value_on_item() {
    let mut s = Scene::new(canvas(), None);
    let id = s.insert(
        image_node(""),
        Some(ThemeItem::new("weather", "icon", ShowType::Image)),
    );
    let job = s
        .begin_load(
            id,
            "./weathericon/02d.png",
            LoadKind::Static { adopt_size: false },
            Some(ItemValue::from("02d")),
        )
        .unwrap();
    assert!(s.get(id).unwrap().image().unwrap().is_pending());
    s.complete_load(LoadResult {
        job,
        outcome: Ok(static_asset(2, 2)),
    });
    assert_eq!(s.item(id).unwrap().value, Some(ItemValue::from("02d")));
    assert_eq!(s.get(id).unwrap().placement.width, 10.0);
}

#[test]
fn preview_fills_in_until_rebuild_lands() {
    let mut s = Scene::new(canvas(), None);
    let id = s.insert(image_node("placeholder.png"), None);
    let preview = s
        .begin_load(id, "placeholder.png", LoadKind::Preview, None)
        .unwrap();
    let rebuild = s
        .begin_load(id, "anim.gif", LoadKind::Sprite(SpriteLimits::default()), None)
        .unwrap();

    assert_eq!(
        s.complete_load(LoadResult {
            job: preview,
            outcome: Ok(static_asset(2, 2)),
        }),
        LoadOutcome::Stale,
        "a rebuild issued after the preview supersedes it"
    );

    let preview = s
        .begin_load(id, "placeholder.png", LoadKind::Preview, None)
        .unwrap();
    assert_eq!(
        s.complete_load(LoadResult {
            job: preview,
            outcome: Ok(static_asset(2, 2)),
        }),
        LoadOutcome::Applied
    );
    assert!(matches!(
        s.get(id).unwrap().image().unwrap().content,
        ImageContent::Static(_)
    ));

    assert_eq!(
        s.complete_load(LoadResult {
            job: rebuild,
            outcome: Ok(sprite_asset()),
        }),
        LoadOutcome::Applied
    );
    assert!(matches!(
        s.get(id).unwrap().image().unwrap().content,
        ImageContent::Sprite(_)
    ));
    assert_eq!(s.iter().count(), 1);
}

#[test]
fn failed_rebuild_keeps_placeholder() {
    let mut s = Scene::new(canvas(), None);
    let id = s.insert(image_node("placeholder.png"), None);
    let rebuild = s
        .begin_load(id, "anim.gif", LoadKind::Sprite(SpriteLimits::default()), None)
        .unwrap();
    let preview = s
        .begin_load(id, "placeholder.png", LoadKind::Preview, None)
        .unwrap();
    s.complete_load(LoadResult {
        job: preview,
        outcome: Ok(static_asset(2, 2)),
    });
    let out = s.complete_load(LoadResult {
        job: rebuild,
        outcome: Err(ThemeError::EmptyAnimation),
    });
    assert_eq!(out, LoadOutcome::Failed);
    assert!(matches!(
        s.get(id).unwrap().image().unwrap().content,
        ImageContent::Static(_)
    ));
    assert!(!s.get(id).unwrap().image().unwrap().is_pending());
}

#[test]
fn loads_for_removed_nodes_are_stale() {
    let mut s = Scene::new(canvas(), None);
    let id = s.insert(image_node("a.png"), None);
    let job = s
        .begin_load(id, "b.png", LoadKind::Static { adopt_size: false }, None)
        .unwrap();
    s.remove(id);
    assert_eq!(
        s.complete_load(LoadResult {
            job,
            outcome: Ok(static_asset(1, 1)),
        }),
        LoadOutcome::Stale
    );
}
