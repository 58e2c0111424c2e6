use std::fmt::Write as _;

use super::{
    BackgroundFill, EmuRect, Geometry, MediaRef, NativeSlide, ParagraphAlign, PictureObject,
    ShapeObject, SlideObject, TextAnchor, TextObject, fmt_err, srgb,
};
use crate::{
    foundation::{core::Color, error::SlideResult},
    render::markup::escape_xml,
};

/// Shadow under shadowed text: 4pt blur, 1pt distance, straight down.
const SHADOW_BLUR_EMU: i64 = 50_800;
const SHADOW_DIST_EMU: i64 = 12_700;
const SHADOW_ALPHA: u32 = 45_000;

fn rel_id(media: &[MediaRef], m: MediaRef) -> String {
    let pos = media.iter().position(|x| *x == m).unwrap_or(0);
    format!("rId{}", pos + 2)
}

/// `<a:srgbClr>` with an alpha child when translucent.
fn color_xml(xml: &mut String, c: Color) -> std::fmt::Result {
    if c.a == 255 {
        write!(xml, r#"<a:srgbClr val="{}"/>"#, srgb(c))
    } else {
        let alpha = u32::from(c.a) * 100_000 / 255;
        write!(
            xml,
            r#"<a:srgbClr val="{}"><a:alpha val="{alpha}"/></a:srgbClr>"#,
            srgb(c)
        )
    }
}

fn xfrm(xml: &mut String, b: EmuRect) -> std::fmt::Result {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        b.x, b.y, b.cx, b.cy
    )
}

pub(super) fn slide_xml(slide: &NativeSlide, media: &[MediaRef]) -> SlideResult<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(concat!(
        r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#
    ));
    write!(xml, r#"<p:cSld name="{}">"#, escape_xml(&slide.name)).map_err(fmt_err)?;

    // Background precedes the shape tree.
    xml.push_str("<p:bg><p:bgPr>");
    match slide.background {
        BackgroundFill::Solid(c) => {
            xml.push_str("<a:solidFill>");
            color_xml(&mut xml, Color { a: 255, ..c }).map_err(fmt_err)?;
            xml.push_str("</a:solidFill>");
        }
        BackgroundFill::Picture(m) => {
            write!(
                xml,
                r#"<a:blipFill dpi="0" rotWithShape="1"><a:blip r:embed="{}"/><a:srcRect/><a:stretch><a:fillRect/></a:stretch></a:blipFill>"#,
                rel_id(media, m)
            )
            .map_err(fmt_err)?;
        }
    }
    xml.push_str("<a:effectLst/></p:bgPr></p:bg>");

    xml.push_str("<p:spTree>");
    xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
    xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

    for (i, obj) in slide.objects.iter().enumerate() {
        let id = i + 2;
        match obj {
            SlideObject::Shape(s) => shape_xml(&mut xml, id, s),
            SlideObject::Picture(p) => picture_xml(&mut xml, id, p, &rel_id(media, p.media)),
            SlideObject::Text(t) => text_xml(&mut xml, id, t),
        }
        .map_err(fmt_err)?;
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");
    Ok(xml)
}

pub(super) fn slide_rels(media: &[MediaRef]) -> SlideResult<String> {
    let mut xml = String::with_capacity(512 + media.len() * 160);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#);
    for (k, m) in media.iter().enumerate() {
        write!(
            xml,
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image{}.png"/>"#,
            k + 2,
            m.index() + 1
        )
        .map_err(fmt_err)?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

fn shape_xml(xml: &mut String, id: usize, s: &ShapeObject) -> std::fmt::Result {
    let prst = match s.geometry {
        Geometry::Rect => "rect",
        Geometry::Ellipse => "ellipse",
    };
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>"#,
        escape_xml(&s.name)
    )?;
    xfrm(xml, s.bounds)?;
    write!(xml, r#"<a:prstGeom prst="{prst}"><a:avLst/></a:prstGeom><a:solidFill>"#)?;
    color_xml(xml, s.fill)?;
    xml.push_str("</a:solidFill><a:ln><a:noFill/></a:ln></p:spPr></p:sp>");
    Ok(())
}

fn picture_xml(xml: &mut String, id: usize, p: &PictureObject, rid: &str) -> std::fmt::Result {
    write!(
        xml,
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="Picture {id}" descr="{}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
        escape_xml(&p.description)
    )?;
    write!(
        xml,
        r#"<p:blipFill><a:blip r:embed="{rid}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>"#
    )?;
    xfrm(xml, p.bounds)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
    Ok(())
}

fn text_xml(xml: &mut String, id: usize, t: &TextObject) -> std::fmt::Result {
    write!(
        xml,
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#
    )?;
    xfrm(xml, t.bounds)?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);

    let anchor = match t.anchor {
        TextAnchor::Top => "t",
        TextAnchor::Middle => "ctr",
    };
    write!(
        xml,
        r#"<p:txBody><a:bodyPr wrap="square" lIns="0" tIns="0" rIns="0" bIns="0" rtlCol="0" anchor="{anchor}"><a:noAutofit/></a:bodyPr><a:lstStyle/>"#
    )?;

    let algn = match t.align {
        ParagraphAlign::Left => "l",
        ParagraphAlign::Center => "ctr",
        ParagraphAlign::Right => "r",
    };
    for line in t.text.split('\n') {
        write!(
            xml,
            r#"<a:p><a:pPr algn="{algn}"><a:lnSpc><a:spcPct val="{}"/></a:lnSpc></a:pPr>"#,
            t.line_spacing
        )?;
        if line.is_empty() {
            write!(xml, r#"<a:endParaRPr lang="en-US" sz="{}" dirty="0"/></a:p>"#, t.size)?;
            continue;
        }
        write!(xml, r#"<a:r><a:rPr lang="en-US" sz="{}""#, t.size)?;
        if t.bold {
            xml.push_str(r#" b="1""#);
        }
        if t.italic {
            xml.push_str(r#" i="1""#);
        }
        xml.push_str(r#" dirty="0"><a:solidFill>"#);
        color_xml(xml, t.color)?;
        xml.push_str("</a:solidFill>");
        if t.shadow {
            write!(
                xml,
                r#"<a:effectLst><a:outerShdw blurRad="{SHADOW_BLUR_EMU}" dist="{SHADOW_DIST_EMU}" dir="5400000" algn="t" rotWithShape="0"><a:srgbClr val="000000"><a:alpha val="{SHADOW_ALPHA}"/></a:srgbClr></a:outerShdw></a:effectLst>"#
            )?;
        }
        let face = escape_xml(&t.typeface);
        write!(
            xml,
            r#"<a:latin typeface="{face}"/><a:ea typeface="{face}"/><a:cs typeface="{face}"/></a:rPr><a:t>{}</a:t></a:r></a:p>"#,
            escape_xml(line)
        )?;
    }
    xml.push_str("</p:txBody></p:sp>");
    Ok(())
}
