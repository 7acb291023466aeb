use crate::colorings::{colorize, ColorFromCount, RgbImage};
use crate::error::Result;
use crate::image::ImageBuffer;
use crate::raster::FillJob;
use crate::strategies::FillStrategy;
use crate::timing::{timed_fill, Timed};
use async_channel::{Receiver, Sender};

/// A request to the background renderer.
#[derive(Clone)]
pub struct RenderReq {
    pub job: FillJob,
    pub width: usize,
    pub height: usize,
    pub strategy: Box<dyn FillStrategy>,
    pub coloring: Box<dyn ColorFromCount>,
}

pub struct RenderReply {
    pub counts: ImageBuffer,
    pub image: RgbImage,
    /// The human readable timing line for this fill
    pub report: String,
}

/// Render a single request on the calling thread.
pub fn render(req: &RenderReq) -> Result<RenderReply> {
    let timed = timed_fill(req.strategy.as_ref(), &req.job, req.height, req.width)?;
    reply_for(timed, req.job.max_iters, req.coloring.as_ref())
}

/// Color a finished fill, keeping its counts and its timing line.
pub fn reply_for(timed: Timed, max: u32, coloring: &dyn ColorFromCount) -> Result<RenderReply> {
    let image = colorize(&timed.buffer, max, coloring)?;
    Ok(RenderReply {
        report: timed.report_line(),
        counts: timed.buffer,
        image,
    })
}

/// Serve render requests until either channel is closed.
///
/// Requests that pile up while a render is running are collapsed: only the
/// newest one is rendered.
pub fn render_producer(req_receiver: Receiver<RenderReq>, reply_sender: Sender<Result<RenderReply>>) {
    while let Ok(mut req) = req_receiver.recv_blocking() {
        let mut skipped = 0;
        while let Ok(newer) = req_receiver.try_recv() {
            req = newer;
            skipped += 1;
        }
        if skipped > 0 {
            log::debug!("skipped {} outdated render requests", skipped);
        }
        if reply_sender.send_blocking(render(&req)).is_err() {
            break;
        }
    }
    log::debug!("render producer stopped");
}
