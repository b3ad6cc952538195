//! Markup output: standalone SVG document and the HTML page with the checkbox panel.

use maud::{DOCTYPE, Markup, Render, html};

use super::scene::{Axis, AxisOrient, Scene};
use super::util::fmt_num;

/// The chart as an `<svg>` element. SVG children are written with explicit
/// closing tags so the output stays well-formed XML.
pub struct SvgChart<'a>(pub &'a Scene);

impl Render for SvgChart<'_> {
    fn render(&self) -> Markup {
        let scene = self.0;
        let swatch_x = fmt_num(scene.inner_width - 18.0);
        let text_x = fmt_num(scene.inner_width - 24.0);
        let t = &scene.title;
        html! {
            svg xmlns="http://www.w3.org/2000/svg"
                width=(scene.outer_width)
                height=(scene.outer_height)
                font-family="sans-serif"
                font-size=(scene.label_font_px)
            {
                g transform={ "translate(" (fmt_num(scene.origin.0)) "," (fmt_num(scene.origin.1)) ")" } {
                    (AxisMarkup(&scene.x_axis))
                    (AxisMarkup(&scene.y_axis))
                    @for group in &scene.groups {
                        g class="category" transform={ "translate(0," (fmt_num(group.offset)) ")" } {
                            @for bar in group.bars() {
                                rect x=(fmt_num(bar.x))
                                    y=(fmt_num(bar.y))
                                    id=(bar.id)
                                    width=(fmt_num(bar.width()))
                                    height=(fmt_num(bar.height))
                                    style={ "fill: " (bar.fill.to_hex()) ";" } {}
                            }
                        }
                    }
                    @for entry in &scene.legend {
                        g class="legend" transform={ "translate(0," (fmt_num(entry.offset_y)) ")" } {
                            rect class="legend-color" x=(swatch_x) width="18" height="18"
                                style={ "fill: " (entry.color.to_hex()) ";" } {}
                            text class="legend-text" x=(text_x) y="9" dy=".35em"
                                style="text-anchor: end;" { (entry.label) }
                        }
                    }
                    text x=(fmt_num(t.x)) y=(fmt_num(t.y)) text-anchor="middle"
                        style={ "font-size: " (t.font_px) "px; font-weight: bold;" } { (t.text) }
                }
            }
        }
    }
}

/// One axis group: ticks first, then the domain path.
struct AxisMarkup<'a>(&'a Axis);

impl Render for AxisMarkup<'_> {
    fn render(&self) -> Markup {
        let axis = self.0;
        let size = fmt_num(Axis::TICK_SIZE);
        let neg_size = fmt_num(-Axis::TICK_SIZE);
        let gap = Axis::TICK_SIZE + Axis::TICK_PADDING;
        let (e0, e1) = (fmt_num(axis.extent.0), fmt_num(axis.extent.1));
        let (class, domain) = match axis.orient {
            AxisOrient::Bottom => ("x axis", format!("M{e0},{size}V0H{e1}V{size}")),
            AxisOrient::Left => ("y axis", format!("M{neg_size},{e0}H0V{e1}H{neg_size}")),
        };
        html! {
            g class=(class) transform={ "translate(" (fmt_num(axis.origin.0)) "," (fmt_num(axis.origin.1)) ")" } {
                @for tick in &axis.ticks {
                    @match axis.orient {
                        AxisOrient::Bottom => {
                            g class="tick" transform={ "translate(" (fmt_num(tick.offset)) ",0)" } {
                                line y2=(size) x2="0" stroke="black" {}
                                text dy=".71em" y=(fmt_num(gap)) x="0" style="text-anchor: middle;" { (tick.label) }
                            }
                        }
                        AxisOrient::Left => {
                            g class="tick" transform={ "translate(0," (fmt_num(tick.offset)) ")" } {
                                line x2=(neg_size) y2="0" stroke="black" {}
                                text dy=".32em" x=(fmt_num(-gap)) y="0" style="text-anchor: end;" { (tick.label) }
                            }
                        }
                    }
                }
                path class="domain" d=(domain) fill="none" stroke="black" {}
            }
        }
    }
}

/// Serialize the scene as an SVG document.
pub fn scene_to_svg(scene: &Scene) -> String {
    SvgChart(scene).render().into_string()
}

/// Page with the `.categories` checkbox panel and the `.graph` container.
pub fn scene_to_html(scene: &Scene) -> String {
    let page = html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (scene.title.text) }
            }
            body {
                div class="categories" {
                    @for cb in &scene.checkboxes {
                        div class="checkbox" {
                            label {
                                input id=(cb.id) type="checkbox" class="category" checked[cb.checked];
                                (cb.label)
                            }
                        }
                    }
                }
                div class="graph" {
                    (SvgChart(scene))
                }
            }
        }
    };
    page.into_string()
}

#[cfg(test)]
mod tests {
    use crate::models::SelectionState;
    use crate::viz::{ChartConfig, ChartRenderer};
    use crate::Dataset;

    fn titled(title: &str) -> ChartRenderer {
        let config = ChartConfig {
            title: Some(title.to_string()),
            ..ChartConfig::default()
        };
        let mut r = ChartRenderer::new(Dataset::london_cost_of_living(), config);
        r.update(&SelectionState::all(r.dataset()));
        r.settle();
        r
    }

    #[test]
    fn text_is_escaped() {
        let r = titled(r#"Food & "fuel" <50%>"#);
        let svg = r.to_svg();
        assert!(svg.contains("Food &amp; &quot;fuel&quot; &lt;50%&gt;"));
        assert!(!svg.contains("<50%>"));
        assert!(r.to_html().contains("<title>Food &amp;"));
    }

    #[test]
    fn svg_children_are_closed() {
        let svg = titled("t").to_svg();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<rect ").count(), svg.matches("</rect>").count());
        assert_eq!(svg.matches("<line ").count(), svg.matches("</line>").count());
    }

    #[test]
    fn unchecked_boxes_have_no_checked_attribute() {
        let mut r = titled("t");
        r.toggle("may22", false);
        let html = r.to_html();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<input id="may22" type="checkbox" class="category">May 2022"#));
        assert_eq!(html.matches(" checked>").count(), 3);
    }
}
