use crate::math::Spectrum;

// Based on Physically Based Rendering 3rd ed.
// https://www.pbr-book.org/3ed-2018/Reflection_Models/Specular_Reflection_and_Transmission

/// Unpolarized Fresnel reflectance at a dielectric boundary.
///
/// `cos_theta_i` is signed: negative values mean the incident direction is
/// on the transmitted side and the indices are swapped accordingly.
pub fn dielectric(cos_theta_i: f32, eta_i: f32, eta_t: f32) -> f32 {
    let cos_theta_i = cos_theta_i.clamp(-1.0, 1.0);
    let (eta_i, eta_t, cos_theta_i) = if cos_theta_i > 0.0 {
        (eta_i, eta_t, cos_theta_i)
    } else {
        (eta_t, eta_i, -cos_theta_i)
    };

    let sin_theta_i = (1.0 - cos_theta_i * cos_theta_i).max(0.0).sqrt();
    let sin_theta_t = eta_i / eta_t * sin_theta_i;
    if sin_theta_t >= 1.0 {
        // Total internal reflection
        return 1.0;
    }
    let cos_theta_t = (1.0 - sin_theta_t * sin_theta_t).max(0.0).sqrt();

    let r_parl = (eta_t * cos_theta_i - eta_i * cos_theta_t)
        / (eta_t * cos_theta_i + eta_i * cos_theta_t);
    let r_perp = (eta_i * cos_theta_i - eta_t * cos_theta_t)
        / (eta_i * cos_theta_i + eta_t * cos_theta_t);
    (r_parl * r_parl + r_perp * r_perp) / 2.0
}

/// Approximate Fresnel reflectance at a conductor, incident from vacuum.
pub fn conductor(cos_theta_i: f32, eta: Spectrum, k: Spectrum) -> Spectrum {
    let cos_theta_i = cos_theta_i.clamp(0.0, 1.0);
    let cos_2_theta = cos_theta_i * cos_theta_i;
    let sin_2_theta = 1.0 - cos_2_theta;

    let eta_2 = eta * eta;
    let k_2 = k * k;

    let t0 = eta_2 - k_2 - Spectrum::from(sin_2_theta);
    let a2_plus_b2 = (t0 * t0 + eta_2 * k_2 * 4.0).sqrt();
    let t1 = a2_plus_b2 + Spectrum::from(cos_2_theta);
    let a = ((a2_plus_b2 + t0) * 0.5).sqrt();
    let t2 = a * (2.0 * cos_theta_i);
    let r_s = (t1 - t2) / (t1 + t2);

    let t3 = a2_plus_b2 * cos_2_theta + Spectrum::from(sin_2_theta * sin_2_theta);
    let t4 = t2 * sin_2_theta;
    let r_p = r_s * (t3 - t4) / (t3 + t4);

    (r_p + r_s) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn dielectric_normal_incidence() {
        // ((n-1)/(n+1))^2 for glass against vacuum
        let n = 1.5;
        let expected = ((n - 1.0) / (n + 1.0)) * ((n - 1.0) / (n + 1.0));
        assert_abs_diff_eq!(dielectric(1.0, 1.0, n), expected, epsilon = 1e-6);
        // Symmetric from the inside
        assert_abs_diff_eq!(dielectric(-1.0, 1.0, n), expected, epsilon = 1e-6);
    }

    #[test]
    fn dielectric_grazing_is_total() {
        assert_abs_diff_eq!(dielectric(0.0, 1.0, 1.5), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn dielectric_past_critical_angle() {
        // Inside dense glass, well past the ~41.8deg critical angle
        assert_eq!(dielectric(-0.3, 1.0, 1.5), 1.0);
    }

    #[test]
    fn conductor_reflectance_is_physical() {
        let eta = Spectrum::new(0.143, 0.375, 1.442);
        let k = Spectrum::new(3.983, 2.386, 1.603);
        for &c in &[0.1f32, 0.5, 0.9, 1.0] {
            let f = conductor(c, eta, k);
            assert!(f.is_valid());
            assert!(f.max_component() <= 1.0 + 1e-4);
        }
    }
}
