//! Conversions from canonical models into polars `DataFrame`s.

use polars::prelude::*;

use crate::models::{
    app_info::{APP_INFO_COLUMNS, AppMetadata},
    review::{REVIEW_COLUMNS, ReviewRecord},
};

/// Builds a frame with one row per review, columns in [`REVIEW_COLUMNS`] order.
///
/// Dates are written as RFC 3339 text so they survive a CSV round trip
/// unchanged.
pub fn reviews_to_dataframe(records: &[ReviewRecord]) -> PolarsResult<DataFrame> {
    let [
        id,
        text,
        rating,
        date,
        user,
        thumbs,
        reply,
        code,
        name,
        version,
        source,
    ] = REVIEW_COLUMNS;

    let columns: Vec<Column> = vec![
        Series::new(id.into(), strings(records, |r| &r.review_id)).into(),
        Series::new(text.into(), strings(records, |r| &r.review_text)).into(),
        Series::new(
            rating.into(),
            records.iter().map(|r| r.rating as i32).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            date.into(),
            records
                .iter()
                .map(|r| r.review_date.to_rfc3339())
                .collect::<Vec<_>>(),
        )
        .into(),
        Series::new(user.into(), strings(records, |r| &r.user_name)).into(),
        Series::new(
            thumbs.into(),
            records.iter().map(|r| r.thumbs_up).collect::<Vec<_>>(),
        )
        .into(),
        Series::new(
            reply.into(),
            records
                .iter()
                .map(|r| r.reply_content.clone())
                .collect::<Vec<Option<String>>>(),
        )
        .into(),
        Series::new(code.into(), strings(records, |r| &r.entity_code)).into(),
        Series::new(name.into(), strings(records, |r| &r.entity_name)).into(),
        Series::new(version.into(), strings(records, |r| &r.app_version)).into(),
        Series::new(source.into(), strings(records, |r| &r.source)).into(),
    ];

    DataFrame::new(columns)
}

/// Builds a frame with one row per application listing.
pub fn app_info_to_dataframe(infos: &[AppMetadata]) -> PolarsResult<DataFrame> {
    let [app_id, title, score, ratings, reviews, installs, code, name] = APP_INFO_COLUMNS;

    let columns: Vec<Column> = vec![
        Series::new(app_id.into(), strings(infos, |i| &i.app_id)).into(),
        Series::new(title.into(), strings(infos, |i| &i.title)).into(),
        Series::new(score.into(), infos.iter().map(|i| i.score).collect::<Vec<_>>()).into(),
        Series::new(ratings.into(), infos.iter().map(|i| i.ratings).collect::<Vec<_>>()).into(),
        Series::new(reviews.into(), infos.iter().map(|i| i.reviews).collect::<Vec<_>>()).into(),
        Series::new(installs.into(), strings(infos, |i| &i.installs)).into(),
        Series::new(code.into(), strings(infos, |i| &i.entity_code)).into(),
        Series::new(name.into(), strings(infos, |i| &i.entity_name)).into(),
    ];

    DataFrame::new(columns)
}

fn strings<T>(items: &[T], field: impl Fn(&T) -> &String) -> Vec<String> {
    items.iter().map(|item| field(item).clone()).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn review_frame_has_canonical_columns_in_order() {
        let record = ReviewRecord {
            review_id: "r1".into(),
            review_text: "Works".into(),
            rating: 4,
            review_date: Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap(),
            user_name: "Anonymous".into(),
            thumbs_up: 0,
            reply_content: None,
            entity_code: "CBE".into(),
            entity_name: "Commercial Bank of Ethiopia".into(),
            app_version: "N/A".into(),
            source: "Google Play".into(),
        };

        let df = reviews_to_dataframe(&[record.clone(), record]).unwrap();

        assert_eq!(df.height(), 2);
        let names: Vec<&str> = df.get_column_names().into_iter().map(|n| n.as_str()).collect();
        assert_eq!(names, REVIEW_COLUMNS.to_vec());
        assert_eq!(df.column("reply_content").unwrap().null_count(), 2);
    }
}
