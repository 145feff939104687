//! Okhsl and Okhsv, HSL and HSV style models built on Oklab.
//! <https://bottosson.github.io/posts/colorpicker/>

use std::f64::consts::PI;

use crate::{
    color::{Component, Components, Linearity, Rgba},
    models::{
        oklab::{linear_srgb_to_oklab, oklab_to_linear_srgb},
        rgb::to_gamma_encoded,
        Model,
    },
};

/// Coefficients of the lms response to `a` and `b` along a hue direction.
fn lms_slopes(a: Component, b: Component) -> Components {
    Components(
        0.3963377774 * a + 0.2158037573 * b,
        -0.1055613458 * a - 0.0638541728 * b,
        -0.0894841775 * a - 1.2914855480 * b,
    )
}

/// The largest saturation `S = C / L` that stays in gamut for the
/// normalized hue direction `(a, b)`.
fn compute_max_saturation(a: Component, b: Component) -> Component {
    // Pick the channel that goes below zero first.
    let (k0, k1, k2, k3, k4, wl, wm, ws) = if -1.88170328 * a - 0.80936493 * b > 1.0 {
        (
            1.19086277, 1.76576728, 0.59662641, 0.75515197, 0.56771245, 4.0767416621,
            -3.3077115913, 0.2309699292,
        )
    } else if 1.81444104 * a - 1.19445276 * b > 1.0 {
        (
            0.73956515, -0.45954404, 0.08285427, 0.12541070, 0.14503204, -1.2684380046,
            2.6097574011, -0.3413193965,
        )
    } else {
        (
            1.35733652, -0.00915799, -1.15130210, -0.50559606, 0.00692167, -0.0041960863,
            -0.7034186147, 1.7076147010,
        )
    };

    let saturation = k0 + k1 * a + k2 * b + k3 * a * a + k4 * a * b;

    // One Halley step to refine the polynomial fit.
    let Components(k_l, k_m, k_s) = lms_slopes(a, b);

    let l_ = 1.0 + saturation * k_l;
    let m_ = 1.0 + saturation * k_m;
    let s_ = 1.0 + saturation * k_s;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    let l_ds = 3.0 * k_l * l_ * l_;
    let m_ds = 3.0 * k_m * m_ * m_;
    let s_ds = 3.0 * k_s * s_ * s_;

    let l_ds2 = 6.0 * k_l * k_l * l_;
    let m_ds2 = 6.0 * k_m * k_m * m_;
    let s_ds2 = 6.0 * k_s * k_s * s_;

    let f = wl * l + wm * m + ws * s;
    let f1 = wl * l_ds + wm * m_ds + ws * s_ds;
    let f2 = wl * l_ds2 + wm * m_ds2 + ws * s_ds2;

    saturation - f * f1 / (f1 * f1 - 0.5 * f * f2)
}

/// Lightness and chroma of the most saturated color of a hue.
#[derive(Clone, Copy, Debug)]
struct Cusp {
    l: Component,
    c: Component,
}

fn find_cusp(a: Component, b: Component) -> Cusp {
    let s_cusp = compute_max_saturation(a, b);
    let rgb = oklab_to_linear_srgb(Components(1.0, s_cusp * a, s_cusp * b));
    let l = (1.0 / rgb.max()).cbrt();
    Cusp { l, c: l * s_cusp }
}

/// Find the `t` where the line from `(l0, 0)` to `(l1, c1)` leaves the
/// gamut for the hue `(a, b)`.
fn find_gamut_intersection(
    a: Component,
    b: Component,
    l1: Component,
    c1: Component,
    l0: Component,
    cusp: Cusp,
) -> Component {
    if ((l1 - l0) * cusp.c - (cusp.l - l0) * c1) <= 0.0 {
        // Lower half, the triangle is exact.
        return cusp.c * l0 / (c1 * cusp.l + cusp.c * (l0 - l1));
    }

    // Upper half, start from the triangle and refine with a Halley step.
    let mut t = cusp.c * (l0 - 1.0) / (c1 * (cusp.l - 1.0) + cusp.c * (l0 - l1));

    let dl = l1 - l0;
    let dc = c1;
    let Components(k_l, k_m, k_s) = lms_slopes(a, b);

    let l_dt = dl + dc * k_l;
    let m_dt = dl + dc * k_m;
    let s_dt = dl + dc * k_s;

    let lightness = l0 * (1.0 - t) + t * l1;
    let chroma = t * c1;

    let l_ = lightness + chroma * k_l;
    let m_ = lightness + chroma * k_m;
    let s_ = lightness + chroma * k_s;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    let ldt = 3.0 * l_dt * l_ * l_;
    let mdt = 3.0 * m_dt * m_ * m_;
    let sdt = 3.0 * s_dt * s_ * s_;

    let ldt2 = 6.0 * l_dt * l_dt * l_;
    let mdt2 = 6.0 * m_dt * m_dt * m_;
    let sdt2 = 6.0 * s_dt * s_dt * s_;

    let step = |w: [Component; 3]| {
        let f = w[0] * l + w[1] * m + w[2] * s - 1.0;
        let f1 = w[0] * ldt + w[1] * mdt + w[2] * sdt;
        let f2 = w[0] * ldt2 + w[1] * mdt2 + w[2] * sdt2;
        let u = f1 / (f1 * f1 - 0.5 * f * f2);
        if u >= 0.0 {
            -f * u
        } else {
            Component::MAX
        }
    };

    let t_r = step([4.0767416621, -3.3077115913, 0.2309699292]);
    let t_g = step([-1.2684380046, 2.6097574011, -0.3413193965]);
    let t_b = step([-0.0041960863, -0.7034186147, 1.7076147010]);

    t += t_r.min(t_g).min(t_b);
    t
}

const K1: Component = 0.206;
const K2: Component = 0.03;
const K3: Component = (1.0 + K1) / (1.0 + K2);

/// Lightness estimate that makes Oklab lightness closer to CIE-Lab's.
fn toe(x: Component) -> Component {
    0.5 * (K3 * x - K1 + ((K3 * x - K1) * (K3 * x - K1) + 4.0 * K2 * K3 * x).sqrt())
}

fn toe_inv(x: Component) -> Component {
    (x * x + K1 * x) / (K3 * (x + K2))
}

/// (S, T) slopes of the gamut triangle for a cusp.
fn to_st(cusp: Cusp) -> (Component, Component) {
    (cusp.c / cusp.l, cusp.c / (1.0 - cusp.l))
}

/// A smooth approximation of the (S, T) slopes used for the mid saturation.
fn get_st_mid(a: Component, b: Component) -> (Component, Component) {
    let s = 0.11516993
        + 1.0
            / (7.44778970
                + 4.15901240 * b
                + a * (-2.19557347
                    + 1.75198401 * b
                    + a * (-2.13704948 - 10.02301043 * b
                        + a * (-4.24894561 + 5.38770819 * b + 4.69891013 * a))));

    let t = 0.11239642
        + 1.0
            / (1.61320320 - 0.68124379 * b
                + a * (0.40370612
                    + 0.90148123 * b
                    + a * (-0.27087943
                        + 0.61223990 * b
                        + a * (0.00299215 - 0.45399568 * b - 0.14661872 * a))));

    (s, t)
}

/// The chroma at saturation 0.8 (`mid`), and at the gamut edge (`max`),
/// with `zero` the chroma scale near saturation 0.
struct ChromaScale {
    zero: Component,
    mid: Component,
    max: Component,
}

fn get_cs(l: Component, a: Component, b: Component) -> ChromaScale {
    let cusp = find_cusp(a, b);

    let c_max = find_gamut_intersection(a, b, l, 1.0, l, cusp);
    let (s_max, t_max) = to_st(cusp);

    let k = c_max / (l * s_max).min((1.0 - l) * t_max);

    let (s_mid, t_mid) = get_st_mid(a, b);
    let c_a = l * s_mid;
    let c_b = (1.0 - l) * t_mid;
    let c_mid = 0.9 * k * (1.0 / (1.0 / c_a.powi(4) + 1.0 / c_b.powi(4))).sqrt().sqrt();

    let c_a = l * 0.4;
    let c_b = (1.0 - l) * 0.8;
    let c_0 = (1.0 / (1.0 / (c_a * c_a) + 1.0 / (c_b * c_b))).sqrt();

    ChromaScale {
        zero: c_0,
        mid: c_mid,
        max: c_max,
    }
}

const MID: Component = 0.8;
const MID_INV: Component = 1.25;

/// Unit hue direction and hue in degrees of an Oklab color. Grays get hue 0.
fn hue_direction(lab: Components) -> (Component, Component, Component, Component) {
    let Components(_, a, b) = lab;
    let c = (a * a + b * b).sqrt();
    if c < 1e-6 {
        return (1.0, 0.0, 0.0, 0.0);
    }
    let h = 0.5 + 0.5 * (-b).atan2(-a) / PI;
    (a / c, b / c, c, h * 360.0)
}

fn srgb(linear: Components, alpha: Component) -> Rgba {
    let Components(r, g, b) = to_gamma_encoded(&linear);
    Rgba::new(r, g, b, alpha, Linearity::Srgb)
}

colorsite_macros::gen_model! {
    /// A color in Okhsl.
    pub struct Okhsla {
        /// The hue component of the color, in degrees.
        pub h: Component,
        /// The saturation component of the color, 0 to 1.
        pub s: Component,
        /// The lightness component of the color, 0 to 1.
        pub l: Component,
    }
}

impl Model for Okhsla {
    fn from_rgba(color: &Rgba) -> Self {
        let lab = linear_srgb_to_oklab(color.to_linear().to_components());
        let lightness = lab.0;
        let (a_, b_, c, h) = hue_direction(lab);

        if c < 1e-6 || lightness <= 0.0 || lightness >= 1.0 {
            return Okhsla::new(h, 0.0, toe(lightness).clamp(0.0, 1.0), color.alpha);
        }

        let cs = get_cs(lightness, a_, b_);
        let s = if c < cs.mid {
            let k_1 = MID * cs.zero;
            let k_2 = 1.0 - k_1 / cs.mid;
            let t = c / (k_1 + k_2 * c);
            t * MID
        } else {
            let k_0 = cs.mid;
            let k_1 = (1.0 - MID) * cs.mid * cs.mid * MID_INV * MID_INV / cs.zero;
            let k_2 = 1.0 - k_1 / (cs.max - cs.mid);
            let t = (c - k_0) / (k_1 + k_2 * (c - k_0));
            MID + (1.0 - MID) * t
        };

        Okhsla::new(h, s, toe(lightness), color.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        if self.l >= 1.0 {
            return Rgba::new(1.0, 1.0, 1.0, self.alpha, Linearity::Srgb);
        }
        if self.l <= 0.0 {
            return Rgba::new(0.0, 0.0, 0.0, self.alpha, Linearity::Srgb);
        }

        let turns = self.h / 360.0;
        let a_ = (2.0 * PI * turns).cos();
        let b_ = (2.0 * PI * turns).sin();
        let lightness = toe_inv(self.l);

        let cs = get_cs(lightness, a_, b_);
        let c = if self.s < MID {
            let t = MID_INV * self.s;
            let k_1 = MID * cs.zero;
            let k_2 = 1.0 - k_1 / cs.mid;
            t * k_1 / (1.0 - k_2 * t)
        } else {
            let t = (self.s - MID) / (1.0 - MID);
            let k_0 = cs.mid;
            let k_1 = (1.0 - MID) * cs.mid * cs.mid * MID_INV * MID_INV / cs.zero;
            let k_2 = 1.0 - k_1 / (cs.max - cs.mid);
            k_0 + t * k_1 / (1.0 - k_2 * t)
        };

        srgb(
            oklab_to_linear_srgb(Components(lightness, c * a_, c * b_)),
            self.alpha,
        )
    }
}

colorsite_macros::gen_model! {
    /// A color in Okhsv.
    pub struct Okhsva {
        /// The hue component of the color, in degrees.
        pub h: Component,
        /// The saturation component of the color, 0 to 1.
        pub s: Component,
        /// The value component of the color, 0 to 1.
        pub v: Component,
    }
}

impl Model for Okhsva {
    fn from_rgba(color: &Rgba) -> Self {
        let lab = linear_srgb_to_oklab(color.to_linear().to_components());
        let (a_, b_, c, h) = hue_direction(lab);
        let lightness = lab.0;

        if lightness <= 1e-10 {
            return Okhsva::new(h, 0.0, 0.0, color.alpha);
        }

        let cusp = find_cusp(a_, b_);
        let (s_max, t_max) = to_st(cusp);
        let s_0 = 0.5;
        let k = 1.0 - s_0 / s_max;

        // Project onto the triangle edge through the cusp.
        let t = t_max / (c + lightness * t_max);
        let l_v = t * lightness;
        let c_v = t * c;

        let l_vt = toe_inv(l_v);
        let c_vt = c_v * l_vt / l_v;

        // Undo the curved top of the gamut.
        let scale = oklab_to_linear_srgb(Components(l_vt, a_ * c_vt, b_ * c_vt));
        let scale_l = (1.0 / scale.max().max(0.0)).cbrt();

        let lightness = toe(lightness / scale_l);

        let v = lightness / l_v;
        let s = (s_0 + t_max) * c_v / (t_max * s_0 + t_max * k * c_v);

        Okhsva::new(h, s, v, color.alpha)
    }

    fn to_rgba(&self) -> Rgba {
        if self.v <= 0.0 {
            return Rgba::new(0.0, 0.0, 0.0, self.alpha, Linearity::Srgb);
        }

        let turns = self.h / 360.0;
        let a_ = (2.0 * PI * turns).cos();
        let b_ = (2.0 * PI * turns).sin();

        let cusp = find_cusp(a_, b_);
        let (s_max, t_max) = to_st(cusp);
        let s_0 = 0.5;
        let k = 1.0 - s_0 / s_max;

        let l_v = 1.0 - self.s * s_0 / (s_0 + t_max - t_max * k * self.s);
        let c_v = self.s * t_max * s_0 / (s_0 + t_max - t_max * k * self.s);

        let mut lightness = self.v * l_v;
        let mut c = self.v * c_v;

        let l_vt = toe_inv(l_v);
        let c_vt = c_v * l_vt / l_v;

        let l_new = toe_inv(lightness);
        c = c * l_new / lightness;
        lightness = l_new;

        let scale = oklab_to_linear_srgb(Components(l_vt, a_ * c_vt, b_ * c_vt));
        let scale_l = (1.0 / scale.max().max(0.0)).cbrt();

        lightness *= scale_l;
        c *= scale_l;

        srgb(
            oklab_to_linear_srgb(Components(lightness, c * a_, c * b_)),
            self.alpha,
        )
    }
}
