use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::{
    assets::loader::{LoadJob, LoadKind},
    foundation::{
        color::parse_css_color,
        core::{Canvas, OriginX, OriginY, Placement, Rgba8},
        error::{ThemeError, ThemeResult},
    },
    scene::{
        document::{CanvasShape, PrimitiveDoc, SceneDocument},
        graph::{CircleClip, Scene},
        node::{ImageNode, Node, NodeKind, Paint, TextAlign, TextStyle},
    },
    sprite::decode::SpriteLimits,
    theme::item::{ShowType, ThemeItem},
};

/// Largest canvas edge the rasterizer accepts.
pub const MAX_CANVAS_EDGE: u32 = u16::MAX as u32;

/// Knobs that affect scene construction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LoadOptions {
    /// Duration cap for rebuilt animations.
    pub sprite_max_duration_ms: Option<f64>,
}

/// A validated live scene plus the asset work it needs.
#[derive(Debug)]
pub struct LoadedScene {
    /// Scene ready for ticks and paints.
    pub scene: Scene,
    /// Image and sprite loads to submit.
    pub jobs: Vec<LoadJob>,
    /// Custom fonts to register, family -> encoded bytes.
    pub custom_fonts: BTreeMap<String, String>,
}

/// Validate a (migrated) document and build the live scene.
///
/// Every data-bound primitive must have the shape its `showType` requires; violations fail the
/// whole load with [`ThemeError::InvalidScene`] instead of surfacing later inside a tick.
#[tracing::instrument(level = "debug", skip_all)]
pub fn build_scene(doc: &SceneDocument, opts: &LoadOptions) -> ThemeResult<LoadedScene> {
    let (canvas, clip) = canvas_setup(doc)?;
    let body = doc
        .canvas_json
        .as_ref()
        .ok_or_else(|| ThemeError::invalid_scene("document has no canvasJSON"))?;

    let mut scene = Scene::new(canvas, clip);
    scene.set_background(
        body.background
            .as_ref()
            .and_then(|v| v.as_str())
            .and_then(|s| parse_css_color(s).ok()),
    );

    let limits = SpriteLimits {
        max_width: Some(canvas.width),
        max_height: Some(canvas.height),
        max_duration_ms: opts.sprite_max_duration_ms,
    };

    let mut jobs = Vec::new();
    for (i, obj) in body.objects.iter().enumerate() {
        let path = format!("objects[{i}]");
        let node = build_node(obj, &path)?;
        let item = parse_item(obj, &path)?;
        if let Some(item) = item.as_ref().filter(|it| it.is_bound()) {
            validate_shape(&node, item, &path)?;
        }

        let animated = item
            .as_ref()
            .and_then(ThemeItem::animated_media)
            .map(|m| m.src.clone());
        let static_src = node
            .image()
            .map(|img| img.source.clone())
            .filter(|s| !s.trim().is_empty());
        let id = scene.insert(node, item);

        if let Some(src) = animated {
            jobs.extend(scene.begin_load(id, src, LoadKind::Sprite(limits), None));
            if let Some(src) = static_src {
                jobs.extend(scene.begin_load(id, src, LoadKind::Preview, None));
            }
        } else if let Some(src) = static_src {
            jobs.extend(scene.begin_load(
                id,
                src,
                LoadKind::Static { adopt_size: false },
                None,
            ));
        }
    }

    tracing::info!(
        width = canvas.width,
        height = canvas.height,
        nodes = scene.len(),
        bound = scene.bound_ids().len(),
        loads = jobs.len(),
        "scene built"
    );
    Ok(LoadedScene {
        scene,
        jobs,
        custom_fonts: doc.custom_fonts.clone(),
    })
}

fn canvas_setup(doc: &SceneDocument) -> ThemeResult<(Canvas, Option<CircleClip>)> {
    fn edge(v: f64, what: &str) -> ThemeResult<u32> {
        if !v.is_finite() || v < 1.0 || v > f64::from(MAX_CANVAS_EDGE) {
            return Err(ThemeError::invalid_scene(format!(
                "{what} must be within 1..={MAX_CANVAS_EDGE}, got {v}"
            )));
        }
        Ok(v.round() as u32)
    }

    match doc.shape {
        CanvasShape::Rect => Ok((
            Canvas {
                width: edge(doc.width, "width")?,
                height: edge(doc.height, "height")?,
            },
            None,
        )),
        CanvasShape::Circle => {
            let d = edge(doc.radius * 2.0, "circle diameter")?;
            Ok((
                Canvas {
                    width: d,
                    height: d,
                },
                Some(CircleClip {
                    cx: doc.radius,
                    cy: doc.radius,
                    radius: doc.radius,
                }),
            ))
        }
    }
}

fn parse_item(obj: &PrimitiveDoc, path: &str) -> ThemeResult<Option<ThemeItem>> {
    let Some(data) = obj.data.as_ref().filter(|d| d.is_object()) else {
        return Ok(None);
    };
    let Some(tag) = data.get("showType") else {
        return Ok(None);
    };
    let tag = tag.as_str().unwrap_or_default();
    if ShowType::parse(tag).is_none() {
        return Err(ThemeError::invalid_scene(format!(
            "{path}: unrecognized showType '{tag}'"
        )));
    }
    serde_json::from_value::<ThemeItem>(data.clone())
        .map(Some)
        .map_err(|e| ThemeError::invalid_scene(format!("{path}: bad item data: {e}")))
}

fn validate_shape(node: &Node, item: &ThemeItem, path: &str) -> ThemeResult<()> {
    let ok = match item.show_type {
        ShowType::Text => matches!(node.kind, NodeKind::Text { .. }),
        ShowType::BarChart => two_layer(node, |k| matches!(k, NodeKind::Rect { .. })),
        ShowType::DonutChart => two_layer(node, |k| matches!(k, NodeKind::Circle { .. })),
        ShowType::Image => node.image().is_some_and(|img| {
            !img.source.trim().is_empty()
                || item.animated_media().is_some()
                || item.is_weather_icon()
        }),
    };
    if ok {
        return Ok(());
    }
    let want = match item.show_type {
        ShowType::Text => "a text primitive",
        ShowType::BarChart => "a group of two rects",
        ShowType::DonutChart => "a group of two circles",
        ShowType::Image => "an image with a source",
    };
    Err(ThemeError::invalid_scene(format!(
        "{path}: {:?} node for {}/{} must be {want}, found {}",
        item.show_type,
        item.sensor,
        item.attribute,
        node.kind_name()
    )))
}

fn two_layer(node: &Node, layer: impl Fn(&NodeKind) -> bool) -> bool {
    node.children()
        .is_some_and(|c| c.len() >= 2 && layer(&c[0].kind) && layer(&c[1].kind))
}

fn build_node(obj: &PrimitiveDoc, path: &str) -> ThemeResult<Node> {
    let mut placement = placement_of(obj);
    let mut paint = Paint {
        fill: paint_color(&obj.fill, Some(Rgba8::BLACK)),
        stroke: paint_color(&obj.stroke, None),
        stroke_width: obj.stroke_width.filter(|w| w.is_finite() && *w >= 0.0).unwrap_or(1.0),
        dash: obj
            .stroke_dash_array
            .as_deref()
            .map(|d| d.iter().copied().filter(|v| v.is_finite() && *v >= 0.0).collect())
            .unwrap_or_else(SmallVec::new),
    };

    let kind = match obj.kind.as_str() {
        "rect" => NodeKind::Rect {
            rx: obj.rx.unwrap_or(0.0),
            ry: obj.ry.unwrap_or(0.0),
        },
        "circle" => {
            let radius = obj.radius.unwrap_or(placement.width / 2.0).max(0.0);
            if placement.width <= 0.0 {
                placement.width = radius * 2.0;
            }
            if placement.height <= 0.0 {
                placement.height = radius * 2.0;
            }
            NodeKind::Circle {
                radius,
                start_angle: obj.start_angle.unwrap_or(0.0),
                end_angle: obj.end_angle.unwrap_or(360.0),
            }
        }
        "text" | "i-text" | "textbox" => {
            let style = TextStyle {
                font_family: obj.font_family.clone().unwrap_or_default(),
                font_size: obj.font_size.filter(|s| *s > 0.0).unwrap_or(40.0),
                fill: paint.fill.unwrap_or(Rgba8::TRANSPARENT),
                background: paint_color(&obj.background_color, None),
                align: match obj.text_align.as_deref() {
                    Some("center") => TextAlign::Center,
                    Some("right") => TextAlign::Right,
                    _ => TextAlign::Left,
                },
                wrap: obj.kind == "textbox",
            };
            paint.fill = None;
            NodeKind::Text {
                text: obj.text.clone().unwrap_or_default(),
                style,
            }
        }
        "image" => NodeKind::Image(ImageNode::new(obj.src.clone().unwrap_or_default())),
        "group" => {
            let children = obj
                .objects
                .as_deref()
                .unwrap_or_default()
                .iter()
                .enumerate()
                .map(|(i, child)| build_node(child, &format!("{path}.objects[{i}]")))
                .collect::<ThemeResult<Vec<_>>>()?;
            NodeKind::Group { children }
        }
        other => {
            return Err(ThemeError::invalid_scene(format!(
                "{path}: unsupported primitive type '{other}'"
            )));
        }
    };

    Ok(Node {
        name: obj.name.clone(),
        placement,
        paint,
        kind,
    })
}

fn placement_of(obj: &PrimitiveDoc) -> Placement {
    Placement {
        left: obj.left,
        top: obj.top,
        width: obj.width.max(0.0),
        height: obj.height.max(0.0),
        scale_x: obj.scale_x.unwrap_or(1.0),
        scale_y: obj.scale_y.unwrap_or(1.0),
        angle_deg: obj.angle,
        origin_x: match origin(&obj.origin_x) {
            Some(0) | None => OriginX::Left,
            Some(1) => OriginX::Center,
            Some(_) => OriginX::Right,
        },
        origin_y: match origin(&obj.origin_y) {
            Some(0) | None => OriginY::Top,
            Some(1) => OriginY::Center,
            Some(_) => OriginY::Bottom,
        },
        opacity: obj.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
        visible: obj.visible.unwrap_or(true),
    }
}

// 0 = start edge, 1 = center, 2 = end edge.
fn origin(v: &Option<serde_json::Value>) -> Option<u8> {
    match v.as_ref()? {
        serde_json::Value::String(s) => match s.as_str() {
            "left" | "top" => Some(0),
            "center" => Some(1),
            "right" | "bottom" => Some(2),
            _ => None,
        },
        serde_json::Value::Number(n) => {
            let f = n.as_f64()?;
            Some(if f <= 0.25 {
                0
            } else if f < 0.75 {
                1
            } else {
                2
            })
        }
        _ => None,
    }
}

fn paint_color(v: &Option<serde_json::Value>, default: Option<Rgba8>) -> Option<Rgba8> {
    match v {
        None => default,
        Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => None,
        Some(serde_json::Value::String(s)) => match parse_css_color(s) {
            Ok(c) if c.is_invisible() => None,
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(color = %s, error = %e, "unparsable color, using default");
                default
            }
        },
        Some(_) => {
            tracing::debug!("non-solid paint is rendered with the default color");
            default
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/load.rs"]
mod tests;
