use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use image::{ImageFormat, Rgb, RgbImage};
use mockito::{Matcher, Server};
use serde_json::json;
use zigg_api_client::{ApiClient, Session};
use zigg_core::models::{
    BoardCategory, ImagePurpose, MediaFile, NoticeLayout, PostVideoContent,
};
use zigg_core::ConsoleError;
use zigg_processing::DurationProbe;
use zigg_services::{
    AuditionForm, FormAssembler, GalleryItem, MediaSlot, NoticeEditForm, NoticeForm, PostEditForm,
    PostForm, UploadCoordinator,
};

struct FixedDuration(u64);

#[async_trait]
impl DurationProbe for FixedDuration {
    async fn probe_duration(&self, _file: &MediaFile) -> Result<u64, ConsoleError> {
        Ok(self.0)
    }
}

fn png(name: &str, width: u32, height: u32) -> MediaFile {
    let img = RgbImage::from_pixel(width, height, Rgb([120, 40, 200]));
    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), ImageFormat::Png)
        .unwrap();
    MediaFile::new(name, Some("image/png".to_string()), data)
}

fn assembler(server: &Server, seconds: u64) -> FormAssembler {
    let session = Session::in_memory();
    session.begin("Bearer admin").unwrap();
    let client = ApiClient::new(server.url(), session, None).unwrap();
    FormAssembler::new(UploadCoordinator::new(client, Arc::new(FixedDuration(seconds))))
}

fn grant_body(server: &Server, content_id: i64, key: &str) -> String {
    json!({ "contentId": content_id, "url": format!("{}/bucket/{}", server.url(), key) })
        .to_string()
}

#[tokio::test]
async fn image_grant_then_put_succeeds() {
    let mut server = Server::new_async().await;
    let grant = server
        .mock("POST", "/contents/image")
        .match_query(Matcher::UrlEncoded("purpose".into(), "POST_IMAGE".into()))
        .match_body(Matcher::Json(json!({ "extension": "PNG", "width": 40, "height": 30 })))
        .with_status(200)
        .with_body(grant_body(&server, 11, "a"))
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/bucket/a")
        .match_header("content-type", "image/png")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let uploaded = forms
        .uploads()
        .upload_image(&png("a.png", 40, 30), ImagePurpose::PostImage)
        .await
        .unwrap();

    assert_eq!(uploaded.content_id, 11);
    assert_eq!((uploaded.width, uploaded.height), (40, 30));
    grant.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn batch_stops_at_first_failed_put_and_skips_create() {
    let mut server = Server::new_async().await;
    let mut grants = Vec::new();
    for (i, size) in [10u32, 20, 30].into_iter().enumerate() {
        let content_id = i as i64 + 1;
        grants.push(
            server
                .mock("POST", "/contents/image")
                .match_query(Matcher::Any)
                .match_body(Matcher::Json(
                    json!({ "extension": "PNG", "width": size, "height": size }),
                ))
                .with_status(200)
                .with_body(grant_body(&server, content_id, &format!("img{}", content_id)))
                .expect(if content_id == 3 { 0 } else { 1 })
                .create_async()
                .await,
        );
    }
    let put_ok = server
        .mock("PUT", "/bucket/img1")
        .with_status(200)
        .create_async()
        .await;
    let put_fail = server
        .mock("PUT", "/bucket/img2")
        .with_status(500)
        .create_async()
        .await;
    let put_third = server
        .mock("PUT", "/bucket/img3")
        .expect(0)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/boards/posts/1")
        .expect(0)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = PostForm {
        title: "Weekly challenge".into(),
        message: "Show us your best take".into(),
        images: vec![png("1.png", 10, 10), png("2.png", 20, 20), png("3.png", 30, 30)],
        video: None,
    };
    let err = forms
        .create_post(BoardCategory::Free, &form)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Upload { status: 500 }), "{:?}", err);
    for grant in &grants {
        grant.assert_async().await;
    }
    put_ok.assert_async().await;
    put_fail.assert_async().await;
    put_third.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn blank_title_makes_no_network_calls() {
    let mut server = Server::new_async().await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let any_put = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = PostForm {
        title: "   ".into(),
        message: "body".into(),
        images: vec![png("1.png", 10, 10)],
        video: None,
    };
    let err = forms
        .create_post(BoardCategory::Challenge, &form)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Validation(_)), "{:?}", err);
    any_post.assert_async().await;
    any_put.assert_async().await;
}

#[tokio::test]
async fn too_many_notice_attachments_is_a_validation_error() {
    let mut server = Server::new_async().await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = NoticeForm {
        layout: NoticeLayout::Common,
        title: "Event".into(),
        text_content: "Details".into(),
        priority: 10,
        on_click_url: None,
        banner: None,
        attachments: (0..6).map(|i| png(&format!("{}.png", i), 4, 4)).collect(),
    };
    let err = forms.create_notice(&form).await.unwrap_err();
    assert!(matches!(err, ConsoleError::Validation(_)));
    any_post.assert_async().await;
}

#[tokio::test]
async fn banner_only_notice_without_banner_is_rejected() {
    let server = Server::new_async().await;
    let forms = assembler(&server, 0);
    let form = NoticeForm {
        layout: NoticeLayout::BannerOnly,
        title: String::new(),
        text_content: String::new(),
        priority: 10,
        on_click_url: None,
        banner: None,
        attachments: vec![],
    };
    assert!(matches!(
        forms.create_notice(&form).await,
        Err(ConsoleError::Validation(_))
    ));
}

#[tokio::test]
async fn banner_is_padded_before_upload() {
    let mut server = Server::new_async().await;
    let grant = server
        .mock("POST", "/contents/image")
        .match_query(Matcher::UrlEncoded("purpose".into(), "NOTICE_BANNER".into()))
        .match_body(Matcher::Json(json!({ "extension": "JPG", "width": 1500, "height": 860 })))
        .with_status(200)
        .with_body(grant_body(&server, 77, "banner"))
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/bucket/banner")
        .match_header("content-type", "image/jpeg")
        .with_status(200)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/notices")
        .match_header("authorization", "Bearer admin")
        .match_body(Matcher::Json(json!({
            "layout": "BANNER_ONLY",
            "priority": 10,
            "bannerImageContent": 77
        })))
        .with_status(201)
        .with_body(r#"{"noticeId": 5}"#)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = NoticeForm {
        layout: NoticeLayout::BannerOnly,
        title: String::new(),
        text_content: String::new(),
        priority: 10,
        on_click_url: None,
        banner: Some(png("hero.png", 1200, 800)),
        attachments: vec![],
    };
    let created = forms.create_notice(&form).await.unwrap();

    assert_eq!(created["noticeId"], 5);
    grant.assert_async().await;
    put.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn common_notice_references_media_by_content_id() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/contents/image")
        .match_query(Matcher::UrlEncoded("purpose".into(), "NOTICE_IMAGE".into()))
        .with_status(200)
        .with_body(grant_body(&server, 31, "img"))
        .create_async()
        .await;
    let video_grant = server
        .mock("POST", "/contents/video")
        .match_query(Matcher::UrlEncoded("purpose".into(), "NOTICE_VIDEO".into()))
        .match_body(Matcher::Json(json!({ "videoDuration": "42", "videoExtension": "MP4" })))
        .with_status(200)
        .with_body(grant_body(&server, 32, "vid"))
        .create_async()
        .await;
    server
        .mock("PUT", Matcher::Regex("^/bucket/".into()))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/notices")
        .match_body(Matcher::Json(json!({
            "layout": "COMMON",
            "title": "Audition week",
            "textContent": "Schedule inside",
            "noticeImageContent": [31],
            "noticeVideoContent": 32,
            "priority": 3,
            "onClickUrl": null
        })))
        .with_status(201)
        .create_async()
        .await;

    let forms = assembler(&server, 42);
    let form = NoticeForm {
        layout: NoticeLayout::Common,
        title: "Audition week".into(),
        text_content: "Schedule inside".into(),
        priority: 3,
        on_click_url: None,
        banner: None,
        attachments: vec![
            png("poster.png", 8, 8),
            MediaFile::new("teaser.mp4", Some("video/mp4".into()), vec![0; 16]),
        ],
    };
    forms.create_notice(&form).await.unwrap();

    video_grant.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn post_with_video_sends_url_key_and_hms_duration() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/contents/image")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(grant_body(&server, 1, "p1"))
        .create_async()
        .await;
    let video_grant = server
        .mock("POST", "/contents/video")
        .match_query(Matcher::UrlEncoded("purpose".into(), "POST_VIDEO".into()))
        .match_body(Matcher::Json(json!({ "videoDuration": "125", "videoExtension": "MP4" })))
        .with_status(200)
        .with_body(grant_body(&server, 2, "v1"))
        .create_async()
        .await;
    server
        .mock("PUT", Matcher::Regex("^/bucket/".into()))
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/boards/posts/2")
        .match_body(Matcher::Json(json!({
            "postTitle": "Promo",
            "postMessage": "New single out",
            "postImageContent": [format!("{}/bucket/p1", server.url())],
            "postVideoThumbnail": format!("{}/bucket/p1", server.url()),
            "postVideoContent": {
                "videoKey": format!("{}/bucket/v1", server.url()),
                "videoDuration": "00:02:05"
            }
        })))
        .with_status(201)
        .create_async()
        .await;

    let forms = assembler(&server, 125);
    let form = PostForm {
        title: "Promo".into(),
        message: "New single out".into(),
        images: vec![png("cover.png", 12, 12)],
        video: Some(MediaFile::new("mv.mp4", Some("video/mp4".into()), vec![1; 32])),
    };
    forms
        .create_post(BoardCategory::Promotion, &form)
        .await
        .unwrap();

    video_grant.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn post_edit_keeps_existing_keys_first_and_removes_video() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/contents/image")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(grant_body(&server, 9, "new"))
        .create_async()
        .await;
    server
        .mock("PUT", "/bucket/new")
        .with_status(200)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/boards/posts/1/40")
        .match_body(Matcher::Json(json!({
            "postTitle": "Edited",
            "postMessage": "Body",
            "postImageContent": ["https://cdn/old-2.jpg", format!("{}/bucket/new", server.url())],
            "postVideoThumbnail": "https://cdn/old-2.jpg"
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = PostEditForm {
        title: "Edited".into(),
        message: "Body".into(),
        gallery: vec![
            GalleryItem::Upload(png("new.png", 6, 6)),
            GalleryItem::Keep("https://cdn/old-2.jpg".into()),
        ],
        video: MediaSlot::Remove,
        original_video: Some(PostVideoContent {
            video_key: "https://cdn/old.mp4".into(),
            video_duration: "00:00:30".into(),
        }),
        original_thumbnail: Some("https://cdn/old-1.jpg".into()),
    };
    forms
        .update_post(BoardCategory::Free, 40, &form)
        .await
        .unwrap();
    patch.assert_async().await;
}

#[tokio::test]
async fn post_edit_without_images_falls_back_to_original_thumbnail() {
    let mut server = Server::new_async().await;
    let patch = server
        .mock("PATCH", "/boards/posts/3/8")
        .match_body(Matcher::Json(json!({
            "postTitle": "t",
            "postMessage": "m",
            "postImageContent": [],
            "postVideoThumbnail": "https://cdn/thumb.jpg",
            "postVideoContent": { "videoKey": "https://cdn/v.mp4", "videoDuration": "00:01:00" }
        })))
        .with_status(200)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = PostEditForm {
        title: "t".into(),
        message: "m".into(),
        gallery: vec![],
        video: MediaSlot::Keep,
        original_video: Some(PostVideoContent {
            video_key: "https://cdn/v.mp4".into(),
            video_duration: "00:01:00".into(),
        }),
        original_thumbnail: Some("https://cdn/thumb.jpg".into()),
    };
    forms
        .update_post(BoardCategory::Challenge, 8, &form)
        .await
        .unwrap();
    patch.assert_async().await;
}

#[tokio::test]
async fn audition_update_omits_thumbnail_when_unchanged() {
    let mut server = Server::new_async().await;
    let patch = server
        .mock("PATCH", "/auditions/12")
        .match_body(Matcher::Json(json!({
            "title": "Spring open call",
            "company": "ZIGG",
            "qualification": "Anyone 18+",
            "startDate": "2025-03-01",
            "endDate": "2025-03-31"
        })))
        .with_status(200)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = AuditionForm {
        title: "Spring open call".into(),
        company: "ZIGG".into(),
        qualification: "Anyone 18+".into(),
        start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        thumbnail: None,
    };
    forms.update_audition(12, &form).await.unwrap();
    patch.assert_async().await;
}

#[tokio::test]
async fn audition_create_sends_uploaded_thumbnail_id() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/contents/image")
        .match_query(Matcher::UrlEncoded("purpose".into(), "AUDITION_THUMBNAIL".into()))
        .with_status(200)
        .with_body(grant_body(&server, 64, "thumb"))
        .create_async()
        .await;
    server
        .mock("PUT", "/bucket/thumb")
        .with_status(200)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/auditions")
        .match_body(Matcher::PartialJson(json!({ "thumbnailId": 64 })))
        .with_status(201)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = AuditionForm {
        title: "Summer".into(),
        company: "ZIGG".into(),
        qualification: "Dancers".into(),
        start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
        thumbnail: Some(png("thumb.png", 16, 9)),
    };
    forms.create_audition(&form).await.unwrap();
    create.assert_async().await;
}

fn banner_edit(banner: MediaSlot) -> NoticeEditForm {
    NoticeEditForm {
        layout: None,
        title: None,
        text_content: None,
        priority: None,
        on_click_url: None,
        banner,
    }
}

#[tokio::test]
async fn notice_edit_keeping_banner_omits_the_field() {
    let mut server = Server::new_async().await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/notices/4")
        .match_body(Matcher::Json(json!({ "title": "Renamed" })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = NoticeEditForm {
        title: Some("Renamed".into()),
        ..banner_edit(MediaSlot::Keep)
    };
    forms.update_notice(4, &form).await.unwrap();

    patch.assert_async().await;
    any_post.assert_async().await;
}

#[tokio::test]
async fn notice_edit_removing_banner_sends_null() {
    let mut server = Server::new_async().await;
    let patch = server
        .mock("PATCH", "/notices/4")
        .match_body(Matcher::Json(json!({ "bannerImageContent": null })))
        .with_status(200)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    forms
        .update_notice(4, &banner_edit(MediaSlot::Remove))
        .await
        .unwrap();
    patch.assert_async().await;
}

#[tokio::test]
async fn notice_edit_replacing_banner_uploads_padded_image() {
    let mut server = Server::new_async().await;
    let grant = server
        .mock("POST", "/contents/image")
        .match_query(Matcher::UrlEncoded("purpose".into(), "NOTICE_BANNER".into()))
        .match_body(Matcher::Json(json!({ "extension": "JPG", "width": 1500, "height": 860 })))
        .with_status(200)
        .with_body(grant_body(&server, 88, "banner"))
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/bucket/banner")
        .match_header("content-type", "image/jpeg")
        .with_status(200)
        .create_async()
        .await;
    let patch = server
        .mock("PATCH", "/notices/4")
        .match_body(Matcher::Json(json!({ "bannerImageContent": 88 })))
        .with_status(200)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    forms
        .update_notice(4, &banner_edit(MediaSlot::Replace(png("hero.png", 1200, 800))))
        .await
        .unwrap();

    grant.assert_async().await;
    put.assert_async().await;
    patch.assert_async().await;
}

#[tokio::test]
async fn failed_create_after_uploads_is_not_rolled_back() {
    let mut server = Server::new_async().await;
    let grants = server
        .mock("POST", "/contents/image")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(grant_body(&server, 5, "img"))
        .expect(2)
        .create_async()
        .await;
    let puts = server
        .mock("PUT", "/bucket/img")
        .with_status(200)
        .expect(2)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/boards/posts/1")
        .with_status(500)
        .with_body("boom")
        .expect(1)
        .create_async()
        .await;
    let deletes = server
        .mock("DELETE", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = PostForm {
        title: "Weekly challenge".into(),
        message: "Show us your best take".into(),
        images: vec![png("1.png", 10, 10), png("2.png", 20, 20)],
        video: None,
    };
    let err = forms
        .create_post(BoardCategory::Free, &form)
        .await
        .unwrap_err();

    match err {
        ConsoleError::Api { status, message } => {
            assert_eq!(status, Some(500));
            assert_eq!(message, "boom");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    grants.assert_async().await;
    puts.assert_async().await;
    create.assert_async().await;
    deletes.assert_async().await;
}

#[tokio::test]
async fn mislabeled_post_image_fails_before_any_upload() {
    let mut server = Server::new_async().await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let any_put = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let form = PostForm {
        title: "t".into(),
        message: "m".into(),
        images: vec![
            png("1.png", 10, 10),
            MediaFile::new("clip.mp4", Some("video/mp4".into()), vec![0; 16]),
        ],
        video: None,
    };
    let err = forms
        .create_post(BoardCategory::Free, &form)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Validation(_)), "{:?}", err);
    any_post.assert_async().await;
    any_put.assert_async().await;
}

#[tokio::test]
async fn post_edit_counts_the_video_toward_the_limit() {
    let mut server = Server::new_async().await;
    let any_post = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let any_patch = server
        .mock("PATCH", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let forms = assembler(&server, 0);
    let full_gallery: Vec<GalleryItem> = (0..5)
        .map(|i| GalleryItem::Keep(format!("https://cdn/{}.jpg", i)))
        .collect();
    let kept_video = PostEditForm {
        title: "t".into(),
        message: "m".into(),
        gallery: full_gallery.clone(),
        video: MediaSlot::Keep,
        original_video: Some(PostVideoContent {
            video_key: "https://cdn/v.mp4".into(),
            video_duration: "00:00:10".into(),
        }),
        original_thumbnail: None,
    };
    let replaced_video = PostEditForm {
        video: MediaSlot::Replace(MediaFile::new(
            "new.mp4",
            Some("video/mp4".into()),
            vec![0; 16],
        )),
        original_video: None,
        ..kept_video.clone()
    };

    for form in [&kept_video, &replaced_video] {
        let err = forms
            .update_post(BoardCategory::Free, 40, form)
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Validation(_)), "{:?}", err);
    }
    any_post.assert_async().await;
    any_patch.assert_async().await;
}
