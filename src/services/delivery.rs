//! Delivery URL derivation. Pure string construction against the Cloudinary
//! CDN; the transformations mirror what the dashboard player expects:
//! a 480x270 jpg poster, a 15-second animated preview, and the full video
//! as an attachment download.

const DELIVERY_BASE: &str = "https://res.cloudinary.com";

pub fn thumbnail_url(cloud_name: &str, public_id: &str) -> String {
    format!(
        "{}/{}/video/upload/c_fill,g_auto,h_270,w_480,q_auto/{}.jpg",
        DELIVERY_BASE, cloud_name, public_id
    )
}

pub fn preview_url(cloud_name: &str, public_id: &str) -> String {
    format!(
        "{}/{}/video/upload/h_1080,w_1920/e_preview:duration_15:max_seg_9:min_seg_dur_1/{}.mp4",
        DELIVERY_BASE, cloud_name, public_id
    )
}

pub fn download_url(cloud_name: &str, public_id: &str) -> String {
    format!(
        "{}/{}/video/upload/fl_attachment/h_1080,w_1920/{}.mp4",
        DELIVERY_BASE, cloud_name, public_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnail_is_a_cropped_jpg_poster() {
        assert_eq!(
            thumbnail_url("demo", "video-uploads/abc"),
            "https://res.cloudinary.com/demo/video/upload/c_fill,g_auto,h_270,w_480,q_auto/video-uploads/abc.jpg"
        );
    }

    #[test]
    fn preview_clips_to_fifteen_seconds() {
        assert_eq!(
            preview_url("demo", "video-uploads/abc"),
            "https://res.cloudinary.com/demo/video/upload/h_1080,w_1920/e_preview:duration_15:max_seg_9:min_seg_dur_1/video-uploads/abc.mp4"
        );
    }

    #[test]
    fn download_forces_an_attachment() {
        assert_eq!(
            download_url("demo", "video-uploads/abc"),
            "https://res.cloudinary.com/demo/video/upload/fl_attachment/h_1080,w_1920/video-uploads/abc.mp4"
        );
    }
}
