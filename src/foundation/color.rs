use crate::foundation::core::Rgba8;

/// Parse a CSS color string as stored in scene documents.
///
/// Accepted forms: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)`,
/// `hsl(h, s%, l%)`, `hsla(h, s%, l%, a)`, `transparent` and a handful of named colors.
pub fn parse_css_color(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty color string".to_owned());
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
        return parse_rgb_args(&args);
    }
    if let Some(args) = function_args(&lower, "hsla").or_else(|| function_args(&lower, "hsl")) {
        return parse_hsl_args(&args);
    }

    named(&lower).ok_or_else(|| format!("unrecognized color \"{s}\""))
}

/// Parse `s` or fall back to `default`, logging the rejected value.
pub fn css_color_or(s: Option<&str>, default: Rgba8) -> Rgba8 {
    let Some(s) = s else {
        return default;
    };
    match parse_css_color(s) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(color = s, error = %e, "unparsable color, using default");
            default
        }
    }
}

fn function_args(s: &str, name: &str) -> Option<Vec<String>> {
    let rest = s.strip_prefix(name)?.trim_start();
    let inner = rest.strip_prefix('(')?.strip_suffix(')')?;
    Some(
        inner
            .split([',', ' ', '/'])
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect(),
    )
}

fn parse_hex(hex: &str) -> Result<Rgba8, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }
    fn hex_nibble(c: &str) -> Result<u8, String> {
        let v = u8::from_str_radix(c, 16).map_err(|_| format!("invalid hex digit \"{c}\""))?;
        Ok(v * 17)
    }

    if !hex.is_ascii() {
        return Err("hex color must be ascii".to_owned());
    }

    match hex.len() {
        3 | 4 => {
            let r = hex_nibble(&hex[0..1])?;
            let g = hex_nibble(&hex[1..2])?;
            let b = hex_nibble(&hex[2..3])?;
            let a = if hex.len() == 4 {
                hex_nibble(&hex[3..4])?
            } else {
                255
            };
            Ok(Rgba8::rgba(r, g, b, a))
        }
        6 | 8 => {
            let r = hex_byte(&hex[0..2])?;
            let g = hex_byte(&hex[2..4])?;
            let b = hex_byte(&hex[4..6])?;
            let a = if hex.len() == 8 {
                hex_byte(&hex[6..8])?
            } else {
                255
            };
            Ok(Rgba8::rgba(r, g, b, a))
        }
        _ => Err("hex color must be #rgb, #rgba, #rrggbb or #rrggbbaa".to_owned()),
    }
}

fn channel(part: &str) -> Result<u8, String> {
    let v = if let Some(pct) = part.strip_suffix('%') {
        let p: f64 = pct.parse().map_err(|_| format!("invalid channel \"{part}\""))?;
        p / 100.0 * 255.0
    } else {
        part.parse::<f64>()
            .map_err(|_| format!("invalid channel \"{part}\""))?
    };
    Ok(v.round().clamp(0.0, 255.0) as u8)
}

fn alpha(part: Option<&String>) -> Result<u8, String> {
    let Some(part) = part else {
        return Ok(255);
    };
    let v = if let Some(pct) = part.strip_suffix('%') {
        pct.parse::<f64>()
            .map_err(|_| format!("invalid alpha \"{part}\""))?
            / 100.0
    } else {
        part.parse::<f64>()
            .map_err(|_| format!("invalid alpha \"{part}\""))?
    };
    Ok((v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn parse_rgb_args(args: &[String]) -> Result<Rgba8, String> {
    if args.len() != 3 && args.len() != 4 {
        return Err("rgb()/rgba() takes 3 or 4 components".to_owned());
    }
    Ok(Rgba8::rgba(
        channel(&args[0])?,
        channel(&args[1])?,
        channel(&args[2])?,
        alpha(args.get(3))?,
    ))
}

fn parse_hsl_args(args: &[String]) -> Result<Rgba8, String> {
    if args.len() != 3 && args.len() != 4 {
        return Err("hsl()/hsla() takes 3 or 4 components".to_owned());
    }
    let num = |p: &str| -> Result<f64, String> {
        p.trim_end_matches("deg")
            .trim_end_matches('%')
            .parse::<f64>()
            .map_err(|_| format!("invalid hsl component \"{p}\""))
    };
    let h = num(&args[0])?;
    let s = num(&args[1])? / 100.0;
    let l = num(&args[2])? / 100.0;
    let [r, g, b] = hsl_to_rgb(h, s, l);
    let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
    Ok(Rgba8::rgba(to_u8(r), to_u8(g), to_u8(b), alpha(args.get(3))?))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    let h = (h % 360.0 + 360.0) % 360.0 / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    [
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    ]
}

fn named(s: &str) -> Option<Rgba8> {
    let c = match s {
        "transparent" => Rgba8::TRANSPARENT,
        "black" => Rgba8::BLACK,
        "white" => Rgba8::WHITE,
        "red" => Rgba8::rgba(255, 0, 0, 255),
        "green" => Rgba8::rgba(0, 128, 0, 255),
        "lime" => Rgba8::rgba(0, 255, 0, 255),
        "blue" => Rgba8::rgba(0, 0, 255, 255),
        "yellow" => Rgba8::rgba(255, 255, 0, 255),
        "orange" => Rgba8::rgba(255, 165, 0, 255),
        "cyan" | "aqua" => Rgba8::rgba(0, 255, 255, 255),
        "magenta" | "fuchsia" => Rgba8::rgba(255, 0, 255, 255),
        "gray" | "grey" => Rgba8::rgba(128, 128, 128, 255),
        "silver" => Rgba8::rgba(192, 192, 192, 255),
        "purple" => Rgba8::rgba(128, 0, 128, 255),
        _ => return None,
    };
    Some(c)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
