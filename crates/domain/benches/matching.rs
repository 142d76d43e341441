use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Channel, ChannelMessage, Subscription};

fn populated_channel(subscribers: usize) -> Channel {
    let mut channel = Channel::new("general");
    for n in 0..subscribers {
        channel.subscribe(Subscription::new(
            "general",
            format!("user-{n}"),
            format!("keyword-{n}"),
        ));
    }
    channel.take_events();
    channel
}

fn bench_find_subscribed_small(c: &mut Criterion) {
    let channel = populated_channel(10);
    let message = ChannelMessage::new("general", "author", "release keyword-3 shipped");

    c.bench_function("domain/find_subscribed_10", |b| {
        b.iter(|| {
            let hits = channel.find_subscribed(&message).count();
            assert_eq!(hits, 1);
        });
    });
}

fn bench_find_subscribed_large(c: &mut Criterion) {
    let channel = populated_channel(500);
    let message = ChannelMessage::new("general", "author", "release keyword-250 shipped");

    c.bench_function("domain/find_subscribed_500", |b| {
        b.iter(|| {
            let hits = channel.find_subscribed(&message).count();
            assert_eq!(hits, 1);
        });
    });
}

fn bench_record_mentions(c: &mut Criterion) {
    let message = ChannelMessage::new("general", "author", "keyword-1 and keyword-2 and keyword-3");

    c.bench_function("domain/record_mentions_100", |b| {
        b.iter(|| {
            let mut channel = populated_channel(100);
            channel.record_mentions(&message);
            let events = channel.take_events();
            assert_eq!(events.len(), 3);
        });
    });
}

criterion_group!(
    benches,
    bench_find_subscribed_small,
    bench_find_subscribed_large,
    bench_record_mentions,
);
criterion_main!(benches);
