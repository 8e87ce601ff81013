//! # Primitive Shape Generation
//!
//! Unit primitives with outward normals and texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a unit cube centered at the origin
///
/// Returns a cube with vertices from -0.5 to 0.5 on all axes.
/// Each face has proper normals pointing outward and UV coordinates from 0 to 1.
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();
    
    // Cube vertices (8 corners)
    let positions = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face  
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];
    
    // Texture coordinates (same for each face)
    let tex_coords = [
        // Front, Back, Left, Right, Top, Bottom faces
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [1.0, 0.0], [0.0, 0.0], [0.0, 1.0], [1.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];
    
    // Face normals
    let normals = [
        // Front face (positive Z)
        [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
        // Back face (negative Z)
        [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
        // Left face (negative X)
        [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
        // Right face (positive X)
        [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
        // Top face (positive Y)
        [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
        // Bottom face (negative Y)
        [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    ];
    
    data.vertices = positions.to_vec();
    data.tex_coords = tex_coords.to_vec();
    data.normals = normals.to_vec();
    
    // Indices for each face (2 triangles per face, counter-clockwise)
    data.indices = vec![
        // Front face
        0, 1, 2,    2, 3, 0,
        // Back face
        4, 5, 6,    6, 7, 4,
        // Left face
        8, 9, 10,   10, 11, 8,
        // Right face
        12, 13, 14, 14, 15, 12,
        // Top face
        16, 17, 18, 18, 19, 16,
        // Bottom face
        20, 21, 22, 22, 23, 20,
    ];
    
    data
}

/// Generate a UV sphere of radius 1.0 centered at the origin
///
/// `u` runs once around the equator and `v` from the north pole (0) to the
/// south pole (1), so an equirectangular map wraps the sphere directly.
pub fn generate_sphere(longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();
    
    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);
    
    // Generate vertices
    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();
        
        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();
            
            // Spherical to Cartesian coordinates
            let x = sin_theta * cos_phi;
            let y = cos_theta;  // Y-up for rendering
            let z = sin_theta * sin_phi;
            
            data.vertices.push([x, y, z]);
            data.normals.push([x, y, z]); // Normal is same as position for unit sphere
            
            // UV coordinates
            let u = long as f32 / long_segs as f32;
            let v = lat as f32 / lat_segs as f32;
            data.tex_coords.push([u, v]);
        }
    }
    
    // Generate indices
    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;
            
            // The pole rows collapse to a fan, one triangle per segment
            if lat != 0 {
                data.indices.extend_from_slice(&[first, first + 1, second]);
            }
            if lat != lat_segs - 1 {
                data.indices.extend_from_slice(&[second, first + 1, second + 1]);
            }
        }
    }
    
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::mesh::calculate_face_normals;

    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.triangle_count(), 12);

        let mesh = cube.to_mesh_data();
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.tex_coords.len(), 72);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(8, 6);
        assert_eq!(sphere.vertex_count(), 9 * 7);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
        assert_eq!(sphere.triangle_count(), 8 * (6 * 2 - 2));
    }

    #[test]
    fn test_sphere_resolution_is_clamped() {
        let sphere = generate_sphere(0, 0);
        // Two latitude rows, both pole fans
        assert_eq!(sphere.triangle_count(), 3 * 2);
    }

    fn assert_wound_outward(positions: &[f32]) {
        let face_normals = calculate_face_normals(positions);
        for (triangle, normal) in positions.chunks_exact(9).zip(face_normals.chunks_exact(9)) {
            let centroid = [
                triangle[0] + triangle[3] + triangle[6],
                triangle[1] + triangle[4] + triangle[7],
                triangle[2] + triangle[5] + triangle[8],
            ];
            let facing = centroid[0] * normal[0] + centroid[1] * normal[1] + centroid[2] * normal[2];
            assert!(facing > 0.0, "triangle {:?} faces inward", triangle);
        }
    }

    #[test]
    fn test_triangles_are_counter_clockwise_from_outside() {
        assert_wound_outward(&generate_cube().to_mesh_data().positions);
        assert_wound_outward(&generate_sphere(16, 8).to_mesh_data().positions);
    }
}
