use magic_decoder_core::{Bind, RawValues};
use magic_decoder_macros::Bind;

#[derive(Bind, Default)]
struct Page<T: Default> {
    #[bind(form = "page")]
    page: u32,
    #[bind(form = "size")]
    size: usize,
    extra: T,
}

fn main() {
    let mut page: Page<Vec<u8>> = Page::default();
    let values = RawValues::from([("page".to_string(), "3".to_string())]);
    page.bind_from("form", &values).ok();
    assert_eq!(page.page, 3);
    assert_eq!(page.size, 0);
    assert!(page.extra.is_empty());
}
